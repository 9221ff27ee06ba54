//! Input actions, callback events and engine results.

/// Logical actions delivered by the [`ActionSource`](crate::host::ActionSource).
///
/// `None` is the periodic idle tick: it carries no input and only gives the
/// engine a chance to poll external state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Idle tick, no input arrived before the timeout.
    None,
    Up,
    Down,
    PageUp,
    PageDown,
    /// Confirm / activate the highlighted item.
    Ok,
    /// Logical back.
    Cancel,
    /// Open the context menu for the highlighted item.
    Context,
    /// Jump to the main menu.
    Menu,
    /// Open the quick screen.
    QuickScreen,
    /// Go to the now-playing screen.
    Wps,
    /// Stop playback.
    Stop,
    /// Go to the recording screen.
    Record,
    /// Event raised by the rest of the system.
    System(SystemEvent),
}

/// System events that arrive through the action queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemEvent {
    UsbConnected,
    UsbDisconnected,
    CallHungUp,
    PlayPause,
}

/// What a menu callback is being asked about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEvent {
    /// An input action, before the engine acts on it.
    Action(Action),
    /// Should this item be listed? `Veto` hides it.
    RequestVisibility,
    /// The item is being entered or activated. `Veto` aborts activation.
    Enter,
    /// The item was left or finished its activation.
    Exit,
    /// The menu is about to be redrawn.
    Redraw,
}

/// Answer of a menu callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallbackOutcome {
    /// Carry on as if there were no callback.
    Proceed,
    /// Hide the item, abort the activation, or swallow the action.
    Veto,
    /// Keep the action but force a redraw afterwards.
    Redraw,
    /// Keep the action; leave the menu once an item has been activated.
    ExitAfterThisItem,
    /// Act on this action instead.
    Substitute(Action),
}

/// Outcome of the default system event handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventOutcome {
    /// Nothing to do.
    Ignored,
    /// The USB cable was attached; the menu must close.
    UsbConnected,
    /// Something was drawn over the menu; redraw it.
    Redraw,
}

/// Why [`do_menu`](crate::menu::MenuEngine::do_menu) stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuResult {
    /// The loop ended without a specific result.
    Exited,
    /// Index chosen in a string list.
    Selected(usize),
    /// Literal of a return-value item, or a non-zero checked function result.
    Value(i32),
    GoToRoot,
    GoToPrevious,
    /// Go to the now-playing screen.
    GoToPreviousMusic,
    GoToRecording,
    /// Context menu requested on the main menu itself.
    RootItemContext,
    /// A USB cable was attached.
    UsbAttached,
    /// A callback asked to leave after its item was activated.
    SelectedExit,
}

/// Playback state polled on every loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}
