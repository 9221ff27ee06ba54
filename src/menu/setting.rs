//! Setting leaves: pick the editor title and hand over to the store.

use crate::config::TITLE_LEN;
use crate::host::SettingStore;
use crate::settings::SettingDescriptor;

use super::item::{ItemType, MenuItem};
use super::view::push_truncated;

pub type TitleBuf = heapless::String<TITLE_LEN>;

/// Title for a padded setting: `title` repeated, space separated, until the
/// buffer is full. Settings without a display name use their config name.
pub fn padded_title(setting: &SettingDescriptor, title: &str) -> TitleBuf {
    let source = if setting.name.is_none() {
        setting.cfg_name
    } else {
        title
    };
    let mut out = TitleBuf::new();
    if source.is_empty() {
        return out;
    }
    'fill: loop {
        for c in source.chars() {
            if out.push(c).is_err() {
                break 'fill;
            }
        }
        if out.push(' ').is_err() {
            break;
        }
    }
    out
}

/// Open the value editor for `setting` under `title`.
pub fn do_setting_screen(store: &mut dyn SettingStore, setting: &SettingDescriptor, title: &str) {
    if setting.pad_title {
        let padded = padded_title(setting, title);
        store.edit_setting(setting, &padded);
    } else {
        store.edit_setting(setting, title);
    }
}

/// Edit the setting bound to `item`.
///
/// Returns `false` when the item is not a setting leaf or its id is
/// unknown; nothing is edited then.
pub fn do_setting_from_menu(store: &mut dyn SettingStore, item: &MenuItem<'_>) -> bool {
    let Some(id) = item.setting_id() else {
        return false;
    };
    let Some(setting) = store.find_setting(id) else {
        warn!("setting {} not registered", id.0);
        return false;
    };
    let mut title = TitleBuf::new();
    match (item.item_type(), item.text()) {
        (ItemType::SettingWithText, Some(text)) => push_truncated(&mut title, text),
        _ => push_truncated(&mut title, setting.display_name()),
    }
    debug!("editing setting {}", id.0);
    do_setting_screen(store, &setting, &title);
    true
}
