//! SSD1306 OLED display wrapper: the scrolling menu list and the value
//! editor screen.

use defmt::{trace, warn};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use menunav::config::{DISPLAY_ROWS, MAX_MENU_SUBITEMS};
use menunav::menu::{Icon, NameBuf};
use menunav::ui::input_logic::{page_down, page_up, scroll_window, select_next, select_prev};
use menunav::{Action, ListItems};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::board::Error;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Characters per line with the 6×10 font on 128 px.
const ROW_CHARS: usize = 21;

type Row = heapless::String<ROW_CHARS>;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<Display<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(display)
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

fn selected_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::Off)
        .build()
}

fn fit(row: &mut Row, s: &str) {
    for c in s.chars() {
        if row.push(c).is_err() {
            break;
        }
    }
}

fn glyph(icon: Icon) -> char {
    match icon {
        Icon::NoIcon => ' ',
        Icon::Submenu | Icon::SubmenuEntered => '>',
        Icon::Setting => '*',
        Icon::FunctionCall => '-',
        Icon::Custom(_) => '+',
    }
}

/// Menu list on the OLED: title bar plus a window of [`DISPLAY_ROWS`]
/// entries that scrolls with the cursor.
///
/// Rendered rows are cached on every full draw so cursor movement can be
/// redrawn without asking the engine again.
pub struct OledList<I2C> {
    display: Display<I2C>,
    title: Row,
    rows: heapless::Vec<Row, MAX_MENU_SUBITEMS>,
    count: usize,
    selected: usize,
    first: usize,
}

impl<I2C> OledList<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(display: Display<I2C>) -> Self {
        Self {
            display,
            title: Row::new(),
            rows: heapless::Vec::new(),
            count: 0,
            selected: 0,
            first: 0,
        }
    }

    pub fn init(&mut self, count: usize, title: &str, icon: Icon) {
        self.title.clear();
        let _ = self.title.push(glyph(icon));
        let _ = self.title.push(' ');
        fit(&mut self.title, title);
        self.rows.clear();
        self.count = count;
        self.selected = 0;
        self.first = 0;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, pos: usize) {
        self.selected = pos.min(self.count.saturating_sub(1));
        self.first = scroll_window(self.first, self.selected, self.count, DISPLAY_ROWS);
    }

    pub fn handle_action(&mut self, action: Action) -> bool {
        let next = match action {
            Action::Up => select_prev(self.selected, self.count),
            Action::Down => select_next(self.selected, self.count),
            Action::PageUp => page_up(self.selected, DISPLAY_ROWS),
            Action::PageDown => page_down(self.selected, self.count, DISPLAY_ROWS),
            _ => return false,
        };
        self.select(next);
        self.render();
        true
    }

    pub fn draw(&mut self, items: &dyn ListItems) {
        self.rows.clear();
        let mut name = NameBuf::new();
        for pos in 0..items.count() {
            name.clear();
            items.name(pos, &mut name);
            let mut row = Row::new();
            let _ = row.push(glyph(items.icon(pos)));
            let _ = row.push(' ');
            fit(&mut row, &name);
            if self.rows.push(row).is_err() {
                warn!("Display: list truncated at {} rows", MAX_MENU_SUBITEMS);
                break;
            }
        }
        self.render();
    }

    pub fn announce(&mut self, items: &dyn ListItems) {
        // No speech output on this board.
        trace!("Display: voice {}", items.voice(self.selected));
    }

    fn render(&mut self) {
        self.display.clear_buffer();

        let _ = Text::new(&self.title, Point::new(0, 8), text_style()).draw(&mut self.display);
        let _ = Line::new(Point::new(0, 10), Point::new(127, 10))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.display);

        if self.rows.is_empty() {
            let _ = Text::new("(empty)", Point::new(0, 22), text_style()).draw(&mut self.display);
        }

        for (pos, row) in self.rows.iter().enumerate().skip(self.first).take(DISPLAY_ROWS) {
            let y = 22 + ((pos - self.first) as i32 * 10);
            let style = if pos == self.selected {
                let _ = Rectangle::new(Point::new(0, y - 8), Size::new(128, 10))
                    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                    .draw(&mut self.display);
                selected_style()
            } else {
                text_style()
            };
            let _ = Text::new(row, Point::new(0, y), style).draw(&mut self.display);
        }

        let _ = self.display.flush();
    }

    /// Panel contrast, `level` 0..=15.
    pub fn set_contrast(&mut self, level: u8) {
        let contrast = level.min(15) * 17;
        if self.display.set_brightness(Brightness::custom(1, contrast)).is_err() {
            warn!("Display: contrast {} rejected", level);
        }
    }

    /// Value editor screen.
    pub fn draw_value(&mut self, title: &str, value: &str) {
        self.display.clear_buffer();

        let mut line = Row::new();
        fit(&mut line, title);
        let _ = Text::new(&line, Point::new(0, 8), text_style()).draw(&mut self.display);

        let big = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let _ = Text::new(value, Point::new(0, 36), big).draw(&mut self.display);

        let _ = Text::new("UP/DN  SEL:ok", Point::new(0, 60), text_style()).draw(&mut self.display);

        let _ = self.display.flush();
    }
}
