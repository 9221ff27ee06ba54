//! GPIO button input with debouncing.
//!
//! Three physical buttons (active-low with internal pull-up):
//!   - UP     - previous entry / increase value
//!   - DOWN   - next entry / decrease value
//!   - SELECT - activate; hold to go back
//!
//! UP and DOWN pressed together open the context menu.
//!
//! The menu engine blocks while it waits for input, so the pad is polled
//! instead of running as a separate task.

use defmt::{debug, trace};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{block_for, Duration, Instant};
use menunav::config::{BUTTON_DEBOUNCE_MS, BUTTON_LONG_PRESS_MS, BUTTON_POLL_MS};
use menunav::ui::input_logic::{press_action, Pressed};
use menunav::Action;

/// The three buttons of the board.
pub struct ButtonPad {
    up: Input<'static>,
    down: Input<'static>,
    select: Input<'static>,
}

impl ButtonPad {
    pub fn new(up: AnyPin, down: AnyPin, select: AnyPin) -> Self {
        Self {
            up: Input::new(up, Pull::Up),
            down: Input::new(down, Pull::Up),
            select: Input::new(select, Pull::Up),
        }
    }

    fn levels(&self) -> Pressed {
        Pressed {
            up: self.up.is_low(),
            down: self.down.is_low(),
            select: self.select.is_low(),
        }
    }

    /// Wait up to `timeout_ms` for a completed press. Returns
    /// [`Action::None`] when nothing was pressed in time.
    pub fn next_action(&mut self, timeout_ms: u32) -> Action {
        let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));
        loop {
            if let Some(action) = self.poll_press() {
                debug!("Button: {}", action);
                return action;
            }
            if Instant::now() >= deadline {
                return Action::None;
            }
            block_for(Duration::from_millis(BUTTON_POLL_MS));
        }
    }

    /// Debounce a press that is starting now and wait for its release.
    fn poll_press(&mut self) -> Option<Action> {
        if !self.levels().any() {
            return None;
        }

        // Debounce: wait and re-check.
        block_for(Duration::from_millis(BUTTON_DEBOUNCE_MS));
        let mut seen = self.levels();
        if !seen.any() {
            return None;
        }

        // Collect every button touched until all are released, so a chord
        // pressed slightly out of step still counts.
        let start = Instant::now();
        loop {
            let now = self.levels();
            if !now.any() {
                break;
            }
            seen.up |= now.up;
            seen.down |= now.down;
            seen.select |= now.select;
            block_for(Duration::from_millis(BUTTON_POLL_MS));
        }
        let held_ms = start.elapsed().as_millis() + BUTTON_DEBOUNCE_MS;
        trace!("Button: {} held {} ms", seen, held_ms);

        // Ignore release bounce.
        block_for(Duration::from_millis(BUTTON_DEBOUNCE_MS));
        press_action(seen, held_ms, BUTTON_LONG_PRESS_MS)
    }
}
