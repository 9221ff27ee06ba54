//! Names, icons and voice labels of the entries currently listed.

use crate::host::{ListItems, SettingStore, Voice};

use super::item::{Description, Icon, ItemKind, ItemType, MenuItem, NameBuf};
use super::visibility::VisibleIndexMap;

/// Label of a setting leaf whose id the registry does not know.
const UNKNOWN_SETTING_NAME: &str = "Not Done yet!";

/// Append as much of `s` as fits, cutting at a character boundary.
pub(crate) fn push_truncated<const N: usize>(buf: &mut heapless::String<N>, s: &str) {
    for c in s.chars() {
        if buf.push(c).is_err() {
            break;
        }
    }
}

/// Write the title of `menu` into `buf` and return its icon.
pub fn menu_title(menu: &MenuItem<'_>, buf: &mut NameBuf) -> Icon {
    buf.clear();
    let icon = match menu.desc {
        Description::Static { text, icon } => {
            push_truncated(buf, text);
            icon
        }
        Description::Dynamic { provider, icon } => {
            provider.name(None, buf);
            icon
        }
        Description::None => Icon::NoIcon,
    };
    if icon == Icon::NoIcon {
        Icon::SubmenuEntered
    } else {
        icon
    }
}

/// [`ListItems`] over one menu and its visible-index map.
pub struct MenuView<'v, 'a> {
    menu: &'v MenuItem<'a>,
    visible: &'v VisibleIndexMap,
    settings: &'v dyn SettingStore,
    show_icons: bool,
    talk: bool,
}

impl<'v, 'a> MenuView<'v, 'a> {
    pub fn new(
        menu: &'v MenuItem<'a>,
        visible: &'v VisibleIndexMap,
        settings: &'v dyn SettingStore,
        show_icons: bool,
        talk: bool,
    ) -> Self {
        Self {
            menu,
            visible,
            settings,
            show_icons,
            talk,
        }
    }

    /// Underlying index of `pos` together with the child listed there.
    fn entry(&self, pos: usize) -> Option<(usize, Option<&'a MenuItem<'a>>)> {
        let index = self.visible.underlying_index(pos, self.menu)?;
        Some((index, self.menu.child(index)))
    }

    fn child_name(&self, child: &MenuItem<'_>, index: usize, buf: &mut NameBuf) {
        if let Description::Dynamic { provider, .. } = child.desc {
            if child.item_type() != ItemType::SettingWithText {
                provider.name(Some(index), buf);
                return;
            }
        }
        if let Some(id) = child.setting_id() {
            let name = self
                .settings
                .find_setting(id)
                .map(|s| s.display_name())
                .unwrap_or(UNKNOWN_SETTING_NAME);
            push_truncated(buf, name);
            return;
        }
        if let Some(text) = child.text() {
            push_truncated(buf, text);
        }
    }
}

impl ListItems for MenuView<'_, '_> {
    fn count(&self) -> usize {
        self.visible.len()
    }

    fn name(&self, pos: usize, buf: &mut NameBuf) {
        buf.clear();
        let Some((index, child)) = self.entry(pos) else {
            return;
        };
        match self.menu.kind {
            ItemKind::StringList(labels) => match self.menu.desc {
                Description::Dynamic { provider, .. } => provider.name(Some(index), buf),
                _ => {
                    if let Some(label) = labels.get(index) {
                        push_truncated(buf, label);
                    }
                }
            },
            _ => {
                if let Some(child) = child {
                    self.child_name(child, index, buf);
                }
            }
        }
    }

    fn icon(&self, pos: usize) -> Icon {
        if !self.show_icons {
            return Icon::NoIcon;
        }
        if self.menu.is_string_list() {
            return Icon::FunctionCall;
        }
        let Some((_, Some(child))) = self.entry(pos) else {
            return Icon::NoIcon;
        };
        match child.icon() {
            Icon::NoIcon => match child.item_type() {
                ItemType::Setting | ItemType::SettingWithText => Icon::Setting,
                ItemType::Submenu => Icon::Submenu,
                ItemType::Function | ItemType::ReturnValue => Icon::FunctionCall,
                ItemType::StringList => Icon::NoIcon,
            },
            icon => icon,
        }
    }

    fn voice(&self, pos: usize) -> Voice<'_> {
        if !self.talk {
            return Voice::Silent;
        }
        let Some((index, child)) = self.entry(pos) else {
            return Voice::Silent;
        };
        match self.menu.kind {
            ItemKind::StringList(labels) => match self.menu.desc {
                Description::Dynamic { .. } => Voice::Silent,
                _ => labels.get(index).map_or(Voice::Silent, |l| Voice::Label(l)),
            },
            _ => {
                let Some(child) = child else {
                    return Voice::Silent;
                };
                if let Some(id) = child.setting_id() {
                    return Voice::Setting(id);
                }
                match child.desc {
                    Description::Dynamic { provider, .. } => {
                        if provider.speak(index) {
                            Voice::Silent
                        } else {
                            Voice::Name
                        }
                    }
                    Description::Static { text, .. } => Voice::Label(text),
                    Description::None => Voice::Silent,
                }
            }
        }
    }
}
