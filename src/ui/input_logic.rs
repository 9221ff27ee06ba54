//! Cursor movement of the scrolling list and button-to-action mapping,
//! kept free of hardware so they can be unit tested.

use crate::action::Action;

/// Debounced level of the three buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pressed {
    pub up: bool,
    pub down: bool,
    pub select: bool,
}

impl Pressed {
    pub fn any(&self) -> bool {
        self.up || self.down || self.select
    }
}

/// Action for a completed press.
///
/// `pressed` is everything held during the press, `held_ms` how long
/// SELECT stayed down. UP and DOWN together open the context menu; a long
/// SELECT goes back.
pub fn press_action(pressed: Pressed, held_ms: u64, long_press_ms: u64) -> Option<Action> {
    match pressed {
        Pressed { up: true, down: true, .. } => Some(Action::Context),
        Pressed { select: true, .. } if held_ms >= long_press_ms => Some(Action::Cancel),
        Pressed { select: true, .. } => Some(Action::Ok),
        Pressed { up: true, .. } => Some(Action::Up),
        Pressed { down: true, .. } => Some(Action::Down),
        _ => None,
    }
}

/// Move selection cursor one item up, wrapping to the last item.
pub fn select_prev(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        0
    } else if selected == 0 {
        item_count - 1
    } else {
        (selected - 1).min(item_count - 1)
    }
}

/// Move selection cursor one item down, wrapping to the first item.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if selected + 1 < item_count {
        selected + 1
    } else {
        0
    }
}

/// Move one page up without wrapping.
pub fn page_up(selected: usize, rows: usize) -> usize {
    selected.saturating_sub(rows.max(1))
}

/// Move one page down without wrapping.
pub fn page_down(selected: usize, item_count: usize, rows: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    (selected + rows.max(1)).min(item_count - 1)
}

/// First visible row so that `selected` stays on screen, given the
/// previous first row.
pub fn scroll_window(first: usize, selected: usize, item_count: usize, rows: usize) -> usize {
    let rows = rows.max(1);
    if item_count <= rows {
        return 0;
    }
    let first = if selected < first {
        selected
    } else if selected >= first + rows {
        selected + 1 - rows
    } else {
        first
    };
    first.min(item_count - rows)
}
