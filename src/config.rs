//! Application-wide constants and compile-time configuration.
//!
//! Capacities of the menu engine, timing parameters and the firmware's
//! hardware layout live here so they can be tuned in one place.

// Menu engine

/// Depth of the navigation stack (ancestor menus remembered while
/// descending). Entering a submenu beyond this depth is a silent no-op.
pub const MAX_MENUS: usize = 8;

/// Maximum number of children a single menu can list. Children past this
/// index are never shown.
pub const MAX_MENU_SUBITEMS: usize = 64;

/// Capacity (bytes) of the buffer a dynamic name provider renders into.
pub const NAME_LEN: usize = 80;

/// Capacity (bytes) of a setting-screen title, padded titles included.
pub const TITLE_LEN: usize = 259;

/// Period of the idle tick returned by the action source while no input
/// arrives (ms). Used only to poll playback status for redraws.
pub const ACTION_TICK_MS: u32 = 1000;

/// Number of quick-screen slots a setting can be assigned to.
pub const QUICK_SLOTS: usize = 4;

// Firmware: buttons
//
//   Button UP      → P0.11
//   Button DOWN    → P0.12
//   Button SELECT  → P0.24
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Holding SELECT at least this long produces `Cancel` instead of `Ok` (ms).
pub const BUTTON_LONG_PRESS_MS: u64 = 600;

/// Polling interval of the button pad while waiting for input (ms).
pub const BUTTON_POLL_MS: u64 = 5;

// Firmware: display

/// Number of list rows below the title bar on the 128×64 OLED.
pub const DISPLAY_ROWS: usize = 5;

// Firmware: settings storage

/// Flash page index where settings storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 252;

/// Number of flash pages reserved for settings storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

/// Maximum number of shortcuts the favourites list can hold.
pub const MAX_SHORTCUTS: usize = 8;

/// Runtime switches of one engine instance.
///
/// `main_menu` identifies the firmware's top-level menu: the `Context` and
/// `Menu` actions behave differently there, and `Cancel` does not leave it.
#[derive(Clone, Copy)]
pub struct MenuConfig<'m> {
    pub main_menu: Option<&'m crate::menu::MenuItem<'m>>,
    pub show_icons: bool,
    pub talk_menu: bool,
    pub quick_screen: bool,
    pub tick_ms: u32,
}

impl<'m> MenuConfig<'m> {
    pub const fn new() -> Self {
        Self {
            main_menu: None,
            show_icons: true,
            talk_menu: false,
            quick_screen: true,
            tick_ms: ACTION_TICK_MS,
        }
    }

    pub const fn with_main_menu(mut self, menu: &'m crate::menu::MenuItem<'m>) -> Self {
        self.main_menu = Some(menu);
        self
    }

    pub const fn with_icons(mut self, show: bool) -> Self {
        self.show_icons = show;
        self
    }

    pub const fn with_talk(mut self, talk: bool) -> Self {
        self.talk_menu = talk;
        self
    }

    pub const fn with_quick_screen(mut self, enabled: bool) -> Self {
        self.quick_screen = enabled;
        self
    }

    pub const fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms;
        self
    }
}

impl Default for MenuConfig<'_> {
    fn default() -> Self {
        Self::new()
    }
}
