//! Collaborators the engine drives.
//!
//! The engine owns no hardware. Input, list rendering, setting storage and
//! system services are reached through these traits, which the firmware
//! implements on top of its drivers and the tests implement with scripts.

use crate::action::{Action, EventOutcome, PlaybackStatus};
use crate::error::Error;
use crate::menu::context::ContextChoice;
use crate::menu::item::{Icon, NameBuf};
use crate::settings::{SettingDescriptor, SettingId};

/// Source of user input.
pub trait ActionSource {
    /// Block until an action arrives or `timeout_ms` elapses; the timeout
    /// yields [`Action::None`].
    fn next_action(&mut self, timeout_ms: u32) -> Action;
}

/// How an entry wants to be spoken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Voice<'a> {
    /// Nothing to say (or it was already said).
    Silent,
    /// Speak the label token.
    Label(&'a str),
    /// Speak the rendered name.
    Name,
    /// Speak the setting's name and value.
    Setting(SettingId),
}

/// Entries of the menu being shown, provided by the engine.
pub trait ListItems {
    fn count(&self) -> usize;
    fn name(&self, pos: usize, buf: &mut NameBuf);
    fn icon(&self, pos: usize) -> Icon;
    fn voice(&self, pos: usize) -> Voice<'_>;
}

/// Scrolling selection list that shows the current menu.
pub trait SelectionList {
    /// Start a new list of `count` entries under `title`.
    fn init(&mut self, count: usize, title: &str, icon: Icon);
    /// Highlighted visible position.
    fn selected(&self) -> usize;
    fn select(&mut self, pos: usize);
    /// Handle cursor movement. Returns `true` when the action was consumed.
    fn handle_action(&mut self, action: Action) -> bool;
    fn draw(&mut self, items: &dyn ListItems);
    /// Speak the highlighted entry.
    fn announce(&mut self, items: &dyn ListItems);
}

/// Setting registry, editor and context-menu actions.
pub trait SettingStore {
    fn find_setting(&self, id: SettingId) -> Option<SettingDescriptor>;
    /// Run the value editor. Returns once the user is done.
    fn edit_setting(&mut self, setting: &SettingDescriptor, title: &str);
    /// Whether the setting can be put on the quick screen.
    fn supports_quick_slots(&self, setting: &SettingDescriptor) -> bool;
    fn apply_context_choice(
        &mut self,
        choice: ContextChoice,
        setting: &SettingDescriptor,
    ) -> Result<(), Error>;
}

/// Services of the rest of the firmware.
pub trait SystemHooks {
    fn playback_status(&self) -> PlaybackStatus;
    /// Show the quick screen.
    fn quick_screen(&mut self, action: Action);
    /// Stop playback. Returns `true` when the screen needs a redraw.
    fn stop_playback(&mut self) -> bool;
    /// Default handling of actions the menu does not interpret.
    fn default_event(&mut self, action: Action) -> EventOutcome;
    /// Tell every screen element to redraw (settings may have changed).
    fn broadcast_redraw(&mut self);
}

/// The collaborators of one engine.
pub struct Collaborators<'c> {
    pub input: &'c mut dyn ActionSource,
    pub list: &'c mut dyn SelectionList,
    pub settings: &'c mut dyn SettingStore,
    pub system: &'c mut dyn SystemHooks,
}
