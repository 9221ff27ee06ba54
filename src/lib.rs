//! Data-driven menu navigation for media-player style firmware.
//!
//! The library holds everything that can be tested on the host: the menu
//! item model, the traversal engine and the pure list-cursor logic used by
//! the OLED list. Hardware drivers live in the embedded binary (`main.rs`),
//! which implements the [`host`] traits on top of them.
//!
//! Usage: `cargo test --lib` / `cargo test`
//!
//! The embedded build is `cargo build --release --features embedded`.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod action;
pub mod config;
pub mod error;
pub mod host;
pub mod menu;
pub mod settings;

#[path = "ui/input_logic.rs"]
mod ui_input_logic_impl;

pub mod ui {
    pub mod input_logic {
        pub use crate::ui_input_logic_impl::{
            page_down, page_up, press_action, scroll_window, select_next, select_prev, Pressed,
        };
    }
}

pub use action::{Action, CallbackOutcome, EventOutcome, MenuEvent, MenuResult, PlaybackStatus};
pub use config::MenuConfig;
pub use error::Error;
pub use host::{ActionSource, Collaborators, ListItems, SelectionList, SettingStore, SystemHooks, Voice};
pub use menu::{MenuEngine, MenuItem};
pub use settings::{QuickSlot, SettingDescriptor, SettingId};
