//! Error type for menu collaborators.
//!
//! The traversal engine itself never fails: every degenerate case has a
//! defined fallback. These errors come back from the settings side
//! (applying a context-menu choice) and are logged, not propagated.
//!
//! We avoid `alloc` - all variants are fieldless so the enum stays `Copy`.

/// Failure reported by a [`SettingStore`](crate::host::SettingStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The setting id is not known to the registry.
    UnknownSetting,

    /// Persisting the settings failed.
    Storage,

    /// The setting cannot be placed on the quick screen.
    QuickSlotUnavailable,

    /// The shortcuts list has no free entry.
    ShortcutsFull,
}
