//! User interface subsystem - OLED display + physical buttons.
//!
//! The menu engine and the setting editor both need the buttons and the
//! screen, so the drivers live in `RefCell`s and the engine gets thin
//! handles that borrow them for the duration of one call.
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×64 OLED via I²C
//! - **Buttons**: 3 tactile switches with debouncing (UP, DOWN, SELECT)

pub mod buttons;
pub mod display;

use core::cell::RefCell;

use menunav::menu::Icon;
use menunav::{Action, ActionSource, ListItems, SelectionList};

use buttons::ButtonPad;
use display::OledList;

/// [`ActionSource`] handle on the shared button pad.
pub struct Keys<'h>(pub &'h RefCell<ButtonPad>);

impl ActionSource for Keys<'_> {
    fn next_action(&mut self, timeout_ms: u32) -> Action {
        self.0.borrow_mut().next_action(timeout_ms)
    }
}

/// [`SelectionList`] handle on the shared OLED list.
pub struct Screen<'h, I2C>(pub &'h RefCell<OledList<I2C>>);

impl<I2C> SelectionList for Screen<'_, I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn init(&mut self, count: usize, title: &str, icon: Icon) {
        self.0.borrow_mut().init(count, title, icon);
    }

    fn selected(&self) -> usize {
        self.0.borrow().selected()
    }

    fn select(&mut self, pos: usize) {
        self.0.borrow_mut().select(pos);
    }

    fn handle_action(&mut self, action: Action) -> bool {
        self.0.borrow_mut().handle_action(action)
    }

    fn draw(&mut self, items: &dyn ListItems) {
        self.0.borrow_mut().draw(items);
    }

    fn announce(&mut self, items: &dyn ListItems) {
        self.0.borrow_mut().announce(items);
    }
}
