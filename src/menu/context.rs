//! Context menu of a setting leaf: reset it, or place it on the quick
//! screen / shortcuts list.
//!
//! The menu is a plain string list fed back into the traversal engine; the
//! index it returns is mapped to a [`ContextChoice`] and applied by the
//! [`SettingStore`](crate::host::SettingStore).

use crate::settings::QuickSlot;

use super::item::MenuItem;

pub const CONTEXT_MENU_TITLE: &str = "Context menu";

/// Entries shown when the setting cannot go on the quick screen.
pub const BASIC_ENTRIES: [&str; 1] = ["Reset setting"];

/// Entries shown when quick-screen assignment is available.
pub const QUICK_ENTRIES: [&str; 6] = [
    "Reset setting",
    "Set as top QS item",
    "Set as left QS item",
    "Set as bottom QS item",
    "Set as right QS item",
    "Add to shortcuts",
];

/// Meta-operation picked from the context menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContextChoice {
    /// Restore the default value, save and apply.
    Reset,
    QuickSlot(QuickSlot),
    AddToShortcuts,
}

impl ContextChoice {
    /// Map an index returned by the context menu back to its choice.
    pub fn from_index(index: usize, quick_slots: bool) -> Option<Self> {
        match (index, quick_slots) {
            (0, _) => Some(ContextChoice::Reset),
            (1..=4, true) => QuickSlot::ALL.get(index - 1).copied().map(ContextChoice::QuickSlot),
            (5, true) => Some(ContextChoice::AddToShortcuts),
            _ => None,
        }
    }
}

/// Build the synthetic context menu.
pub const fn build_context_menu(quick_slots: bool) -> MenuItem<'static> {
    if quick_slots {
        MenuItem::string_list(CONTEXT_MENU_TITLE, &QUICK_ENTRIES)
    } else {
        MenuItem::string_list(CONTEXT_MENU_TITLE, &BASIC_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_size_depends_on_quick_slots() {
        assert_eq!(build_context_menu(false).child_count(), 1);
        assert_eq!(build_context_menu(true).child_count(), 6);
        assert!(build_context_menu(true).is_string_list());
        assert_eq!(build_context_menu(true).text(), Some(CONTEXT_MENU_TITLE));
    }

    #[test]
    fn indices_map_to_choices() {
        assert_eq!(ContextChoice::from_index(0, false), Some(ContextChoice::Reset));
        assert_eq!(ContextChoice::from_index(1, false), None);
        assert_eq!(
            ContextChoice::from_index(1, true),
            Some(ContextChoice::QuickSlot(QuickSlot::Top))
        );
        assert_eq!(
            ContextChoice::from_index(4, true),
            Some(ContextChoice::QuickSlot(QuickSlot::Right))
        );
        assert_eq!(ContextChoice::from_index(5, true), Some(ContextChoice::AddToShortcuts));
        assert_eq!(ContextChoice::from_index(6, true), None);
    }
}
