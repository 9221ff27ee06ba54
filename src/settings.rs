//! Setting descriptors as seen by the menu engine.
//!
//! The engine never stores or edits values itself. A setting leaf only
//! carries a [`SettingId`]; the [`SettingStore`](crate::host::SettingStore)
//! resolves it to a [`SettingDescriptor`] holding the editable metadata.

/// Opaque reference to a configuration variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingId(pub u16);

/// Metadata of one editable setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingDescriptor {
    pub id: SettingId,
    /// Display name, `None` for settings that only have a config name.
    pub name: Option<&'static str>,
    /// Name used in the config file.
    pub cfg_name: &'static str,
    /// Repeat the title across the screen (for scroll-speed style settings).
    pub pad_title: bool,
    /// The value is temporary and not persisted.
    pub temp_var: bool,
}

impl SettingDescriptor {
    pub const fn new(id: SettingId, name: &'static str, cfg_name: &'static str) -> Self {
        Self {
            id,
            name: Some(name),
            cfg_name,
            pad_title: false,
            temp_var: false,
        }
    }

    pub const fn padded(mut self) -> Self {
        self.pad_title = true;
        self
    }

    pub const fn temporary(mut self) -> Self {
        self.temp_var = true;
        self
    }

    /// Name shown in lists.
    pub fn display_name(&self) -> &'static str {
        self.name.unwrap_or(self.cfg_name)
    }
}

/// Quick-screen slot next to a hardware button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QuickSlot {
    Top,
    Left,
    Bottom,
    Right,
}

impl QuickSlot {
    pub const ALL: [QuickSlot; crate::config::QUICK_SLOTS] =
        [QuickSlot::Top, QuickSlot::Left, QuickSlot::Bottom, QuickSlot::Right];

    pub const fn index(self) -> usize {
        match self {
            QuickSlot::Top => 0,
            QuickSlot::Left => 1,
            QuickSlot::Bottom => 2,
            QuickSlot::Right => 3,
        }
    }
}

/// Persist entries `0..count` with `save`, carrying on past failures so
/// every entry gets its write. Returns the first error.
pub fn save_all<E>(count: usize, mut save: impl FnMut(usize) -> Result<(), E>) -> Result<(), E> {
    let mut first = Ok(());
    for index in 0..count {
        first = first.and(save(index));
    }
    first
}
