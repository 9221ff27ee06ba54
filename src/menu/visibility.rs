//! Visible-index map: which underlying entries of a menu are listed.

use crate::action::{CallbackOutcome, MenuEvent};
use crate::config::MAX_MENU_SUBITEMS;

use super::item::{ItemContext, ItemKind, MenuItem};

/// Ordered map from visible position to underlying index.
///
/// Must be rebuilt every time a menu is (re)entered: visibility callbacks
/// read external state that changes between renders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleIndexMap {
    indices: heapless::Vec<u8, MAX_MENU_SUBITEMS>,
}

impl VisibleIndexMap {
    pub const fn new() -> Self {
        Self {
            indices: heapless::Vec::new(),
        }
    }

    /// Filter `menu`'s entries through their visibility callbacks.
    ///
    /// Submenu children are asked through their own callback; string-list
    /// entries through the list's callback with the entry index. Entries
    /// past [`MAX_MENU_SUBITEMS`] are dropped.
    pub fn rebuild(&mut self, menu: &MenuItem<'_>) {
        self.indices.clear();
        match menu.kind {
            ItemKind::Submenu(children) => {
                for (i, child) in children.iter().enumerate() {
                    if child.notify(MenuEvent::RequestVisibility) != CallbackOutcome::Veto {
                        self.push(i);
                    }
                }
            }
            ItemKind::StringList(labels) => {
                let callback = menu.callback();
                for i in 0..labels.len() {
                    let outcome =
                        callback.on_action(MenuEvent::RequestVisibility, ItemContext::Index(i));
                    if outcome != CallbackOutcome::Veto {
                        self.push(i);
                    }
                }
            }
            _ => {}
        }
    }

    fn push(&mut self, index: usize) {
        if index < MAX_MENU_SUBITEMS {
            let _ = self.indices.push(index as u8);
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.indices
    }

    /// Underlying index shown at visible position `pos`.
    ///
    /// Filtered menus map through the table (`None` past its end); other
    /// item types are listed unfiltered, so `pos` is returned unchanged.
    pub fn underlying_index(&self, pos: usize, menu: &MenuItem<'_>) -> Option<usize> {
        if menu.is_filtered() {
            self.indices.get(pos).map(|&i| usize::from(i))
        } else {
            Some(pos)
        }
    }

    /// Visible position of `underlying`, or `0` when it is not listed.
    pub fn visible_position(&self, underlying: usize) -> usize {
        self.indices
            .iter()
            .position(|&i| usize::from(i) == underlying)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::item::MenuCallback;
    use core::cell::Cell;

    struct HideWhen<'c>(&'c Cell<bool>);

    impl MenuCallback for HideWhen<'_> {
        fn on_action(&self, event: MenuEvent, _ctx: ItemContext<'_>) -> CallbackOutcome {
            if event == MenuEvent::RequestVisibility && self.0.get() {
                CallbackOutcome::Veto
            } else {
                CallbackOutcome::Proceed
            }
        }
    }

    struct HideOdd;

    impl MenuCallback for HideOdd {
        fn on_action(&self, event: MenuEvent, ctx: ItemContext<'_>) -> CallbackOutcome {
            match (event, ctx) {
                (MenuEvent::RequestVisibility, ItemContext::Index(i)) if i % 2 == 1 => {
                    CallbackOutcome::Veto
                }
                _ => CallbackOutcome::Proceed,
            }
        }
    }

    #[test]
    fn unfiltered_children_are_all_listed() {
        let a = MenuItem::return_value("A", 1);
        let b = MenuItem::return_value("B", 2);
        let children = [&a, &b];
        let menu = MenuItem::submenu("M", &children);
        let mut map = VisibleIndexMap::new();
        map.rebuild(&menu);
        assert_eq!(map.as_slice(), &[0, 1]);
    }

    #[test]
    fn conditional_child_follows_external_state() {
        let hidden = Cell::new(true);
        let cb = HideWhen(&hidden);
        let a = MenuItem::return_value("A", 1);
        let b = MenuItem::return_value("B", 2).with_callback(&cb);
        let c = MenuItem::return_value("C", 3);
        let children = [&a, &b, &c];
        let menu = MenuItem::submenu("M", &children);

        let mut map = VisibleIndexMap::new();
        map.rebuild(&menu);
        assert_eq!(map.as_slice(), &[0, 2]);
        assert_eq!(map.underlying_index(1, &menu), Some(2));
        assert_eq!(map.visible_position(1), 0);

        hidden.set(false);
        map.rebuild(&menu);
        assert_eq!(map.as_slice(), &[0, 1, 2]);
        assert_eq!(map.visible_position(2), 2);
    }

    #[test]
    fn string_list_is_filtered_by_its_own_callback() {
        let menu = MenuItem::string_list("L", &["a", "b", "c", "d"]).with_callback(&HideOdd);
        let mut map = VisibleIndexMap::new();
        map.rebuild(&menu);
        assert_eq!(map.as_slice(), &[0, 2]);
        assert_eq!(map.underlying_index(1, &menu), Some(2));
    }

    #[test]
    fn round_trip_for_every_visible_index() {
        let hidden = Cell::new(true);
        let cb = HideWhen(&hidden);
        let items = [
            MenuItem::return_value("0", 0),
            MenuItem::return_value("1", 1).with_callback(&cb),
            MenuItem::return_value("2", 2),
            MenuItem::return_value("3", 3).with_callback(&cb),
            MenuItem::return_value("4", 4),
        ];
        let refs: [&MenuItem<'_>; 5] = [&items[0], &items[1], &items[2], &items[3], &items[4]];
        let menu = MenuItem::submenu("M", &refs);
        let mut map = VisibleIndexMap::new();
        map.rebuild(&menu);
        for &i in map.as_slice() {
            let pos = map.visible_position(usize::from(i));
            assert!(pos < map.len());
            assert_eq!(map.underlying_index(pos, &menu), Some(usize::from(i)));
        }
    }

    #[test]
    fn non_list_items_are_not_remapped() {
        let leaf = MenuItem::return_value("Leaf", 0);
        let mut map = VisibleIndexMap::new();
        map.rebuild(&leaf);
        assert!(map.is_empty());
        assert_eq!(map.underlying_index(3, &leaf), Some(3));
    }

    #[test]
    fn empty_map_resolves_to_first_position() {
        let map = VisibleIndexMap::new();
        assert_eq!(map.visible_position(5), 0);
        let menu = MenuItem::submenu("Empty", &[]);
        assert_eq!(map.underlying_index(0, &menu), None);
    }
}
