//! Menu traversal engine.
//!
//! [`MenuEngine::do_menu`] shows a menu tree and runs until the user
//! leaves it or picks something that produces a [`MenuResult`]. All state
//! of one invocation lives in a [`MenuState`] value, so sub-flows (the
//! context menu, functions bound to items) can call `do_menu` again
//! without disturbing the outer invocation.
//!
//! The loop is also exposed in pieces ([`enter`](MenuEngine::enter),
//! [`step`](MenuEngine::step), [`leave`](MenuEngine::leave)) for callers
//! that feed actions themselves.

use core::ptr;

use crate::action::{Action, CallbackOutcome, EventOutcome, MenuEvent, MenuResult, PlaybackStatus};
use crate::config::MenuConfig;
use crate::host::Collaborators;

use super::context::{self, ContextChoice};
use super::item::{ItemKind, ItemType, MenuItem, NameBuf};
use super::setting;
use super::stack::NavStack;
use super::view::{menu_title, MenuView};
use super::visibility::VisibleIndexMap;

/// Phase of one invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// Created, nothing shown yet.
    Idle,
    /// A menu is shown, waiting for input.
    Browsing,
    /// An `Ok` action is being carried out.
    Activating,
    /// Terminal.
    Exiting,
}

/// State of one `do_menu` invocation.
pub struct MenuState<'a> {
    menu: &'a MenuItem<'a>,
    visible: VisibleIndexMap,
    /// Menu the visible map and the list were last built for.
    built_for: Option<&'a MenuItem<'a>>,
    stack: NavStack<'a>,
    in_string_list: bool,
    /// A callback asked to leave after the next activation.
    exit_pending: bool,
    /// The list adapter still shows this invocation's list.
    list_owned: bool,
    /// Underlying selection when the list was last handed to someone else.
    last_selected: usize,
    playback: PlaybackStatus,
    state: EngineState,
    result: MenuResult,
}

impl<'a> MenuState<'a> {
    fn new(menu: &'a MenuItem<'a>, playback: PlaybackStatus) -> Self {
        Self {
            menu,
            visible: VisibleIndexMap::new(),
            built_for: None,
            stack: NavStack::new(),
            in_string_list: menu.is_string_list(),
            exit_pending: false,
            list_owned: false,
            last_selected: 0,
            playback,
            state: EngineState::Idle,
            result: MenuResult::Exited,
        }
    }

    /// Menu currently shown.
    pub fn menu(&self) -> &'a MenuItem<'a> {
        self.menu
    }

    /// Number of ancestors on the navigation stack.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn visible(&self) -> &VisibleIndexMap {
        &self.visible
    }

    pub fn in_string_list(&self) -> bool {
        self.in_string_list
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == EngineState::Exiting
    }

    /// Result so far; final once [`is_done`](Self::is_done).
    pub fn result(&self) -> MenuResult {
        self.result
    }

    fn set_state(&mut self, state: EngineState) {
        if self.state != state {
            trace!("menu state {} -> {}", self.state, state);
            self.state = state;
        }
    }

    fn finish(&mut self, result: MenuResult) {
        self.result = result;
        self.set_state(EngineState::Exiting);
    }

    fn stop(&mut self) {
        self.set_state(EngineState::Exiting);
    }
}

/// Runs menus against a set of collaborators.
pub struct MenuEngine<'c, 'm> {
    host: Collaborators<'c>,
    config: MenuConfig<'m>,
}

impl<'c, 'm> MenuEngine<'c, 'm> {
    pub fn new(host: Collaborators<'c>, config: MenuConfig<'m>) -> Self {
        Self { host, config }
    }

    pub fn config(&self) -> &MenuConfig<'m> {
        &self.config
    }

    /// Show `start` and run until it is left.
    ///
    /// `start_selected` is the underlying index to highlight first. When
    /// given, it is updated with the selection of the outermost level on
    /// return.
    pub fn do_menu<'a>(
        &mut self,
        start: &'a MenuItem<'a>,
        start_selected: Option<&mut usize>,
    ) -> MenuResult {
        let selected = start_selected.as_deref().copied().unwrap_or(0);
        let mut state = self.enter(start, selected);
        while !state.is_done() {
            let action = self.host.input.next_action(self.config.tick_ms);
            self.step(&mut state, action);
        }
        self.leave(&state, start_selected)
    }

    /// Build and draw the first list of an invocation.
    pub fn enter<'a>(&mut self, start: &'a MenuItem<'a>, selected: usize) -> MenuState<'a> {
        debug!("menu: enter {}", start.item_type());
        let mut state = MenuState::new(start, self.host.system.playback_status());
        self.load(&mut state, selected, true);
        state.set_state(EngineState::Browsing);
        self.draw(&state);
        state
    }

    /// Handle one action.
    pub fn step<'a>(&mut self, state: &mut MenuState<'a>, action: Action) {
        if state.is_done() {
            return;
        }
        let mut action = action;
        let mut redraw = false;

        let playback = self.host.system.playback_status();
        if playback != state.playback {
            state.playback = playback;
            redraw = true;
        }

        match state.menu.notify(MenuEvent::Action(action)) {
            CallbackOutcome::Proceed => {}
            CallbackOutcome::Veto => action = Action::None,
            CallbackOutcome::Redraw => redraw = true,
            CallbackOutcome::ExitAfterThisItem => {
                state.exit_pending = true;
                state.result = MenuResult::SelectedExit;
            }
            CallbackOutcome::Substitute(substitute) => action = substitute,
        }

        if self.host.list.handle_action(action) {
            return;
        }

        match action {
            Action::QuickScreen if self.config.quick_screen => {
                self.host.system.quick_screen(action);
                redraw = true;
            }
            Action::Record => state.finish(MenuResult::GoToRecording),
            Action::Wps => state.finish(MenuResult::GoToPreviousMusic),
            Action::Stop => redraw |= self.host.system.stop_playback(),
            Action::Context => redraw |= self.context_menu(state),
            Action::Menu => {
                if self.is_main_menu(state.menu) {
                    state.finish(MenuResult::GoToPrevious);
                } else {
                    state.finish(MenuResult::GoToRoot);
                }
            }
            Action::Cancel => redraw |= self.cancel(state),
            Action::Ok => {
                if !self.activate(state) {
                    return;
                }
                redraw = true;
            }
            _ => match self.host.system.default_event(action) {
                EventOutcome::UsbConnected => state.finish(MenuResult::UsbAttached),
                EventOutcome::Redraw => redraw = true,
                EventOutcome::Ignored => {}
            },
        }

        if redraw && !state.is_done() {
            state.menu.notify(MenuEvent::Redraw);
            self.draw(state);
        }
    }

    /// Final result; writes the outermost selection to `start_selected`.
    pub fn leave(&mut self, state: &MenuState<'_>, start_selected: Option<&mut usize>) -> MenuResult {
        if let Some(out) = start_selected {
            *out = match state.stack.bottom() {
                Some(root) => {
                    let mut visible = VisibleIndexMap::new();
                    visible.rebuild(root.menu);
                    root.menu.notify(MenuEvent::Enter);
                    let pos = visible.visible_position(root.selected);
                    visible.underlying_index(pos, root.menu).unwrap_or(0)
                }
                None if state.list_owned => state
                    .visible
                    .underlying_index(self.host.list.selected(), state.menu)
                    .unwrap_or(0),
                None => state.last_selected,
            };
        }
        debug!("menu: leave with {}", state.result);
        state.result
    }

    fn is_main_menu(&self, menu: &MenuItem<'_>) -> bool {
        self.config.main_menu.is_some_and(|main| {
            ptr::addr_eq(main as *const MenuItem<'_>, menu as *const MenuItem<'_>)
        })
    }

    /// Rebuild the visible map of the current menu and re-init the list
    /// with `selected` (underlying index) highlighted.
    fn load(&mut self, state: &mut MenuState<'_>, selected: usize, notify: bool) {
        state.visible.rebuild(state.menu);
        state.built_for = Some(state.menu);
        state.list_owned = true;

        let mut title = NameBuf::new();
        let icon = menu_title(state.menu, &mut title);
        self.host.list.init(state.visible.len(), &title, icon);
        self.host.list.select(state.visible.visible_position(selected));

        if notify {
            state.menu.notify(MenuEvent::Enter);
        }
    }

    fn draw(&mut self, state: &MenuState<'_>) {
        let view = MenuView::new(
            state.menu,
            &state.visible,
            &*self.host.settings,
            self.config.show_icons,
            self.config.talk_menu,
        );
        self.host.list.draw(&view);
        self.host.list.announce(&view);
    }

    /// Underlying index under the cursor, remembered in case the list is
    /// handed to a sub-flow.
    fn selection(&mut self, state: &mut MenuState<'_>) -> Option<usize> {
        let selected = state
            .visible
            .underlying_index(self.host.list.selected(), state.menu)?;
        state.last_selected = selected;
        Some(selected)
    }

    /// Logical back. Returns `true` when the list must be redrawn.
    fn cancel(&mut self, state: &mut MenuState<'_>) -> bool {
        state.in_string_list = false;
        state.menu.notify(MenuEvent::Exit);

        let mut leaving_submenu = false;
        if state.menu.flags.exit_after_this_menu {
            state.stop();
        } else if state.menu.item_type() == ItemType::Submenu {
            leaving_submenu = true;
        }

        match state.stack.pop() {
            Some(parent) => {
                state.menu = parent.menu;
                if !leaving_submenu && parent.menu.flags.exit_after_this_menu {
                    state.stop();
                } else {
                    self.load(state, parent.selected, false);
                }
                true
            }
            None => {
                if !self.is_main_menu(state.menu) {
                    state.finish(MenuResult::GoToPrevious);
                }
                false
            }
        }
    }

    /// Activate the highlighted entry. Returns `false` when the target's
    /// callback vetoed, which ends the invocation.
    fn activate<'a>(&mut self, state: &mut MenuState<'a>) -> bool {
        let Some(selected) = self.selection(state) else {
            return true;
        };
        state.set_state(EngineState::Activating);

        let target = if state.in_string_list {
            None
        } else {
            state.menu.child(selected)
        };

        if let Some(target) = target {
            if target.notify(MenuEvent::Enter) == CallbackOutcome::Veto {
                debug!("menu: activation of {} vetoed", selected);
                state.stop();
                return false;
            }
        }

        if state.in_string_list {
            state.finish(MenuResult::Selected(selected));
        } else if let Some(target) = target {
            self.activate_target(state, target, selected);
        } else {
            state.finish(MenuResult::GoToPrevious);
        }

        if let Some(target) = target {
            if target.item_type() != ItemType::Submenu {
                target.notify(MenuEvent::Exit);
            }
        }

        if !state.built_for.is_some_and(|built| ptr::eq(built, state.menu)) {
            self.load(state, selected, true);
        }

        let target_exits = target.is_some_and(|t| t.flags.exit_after_this_menu);
        if state.menu.flags.exit_after_this_menu && !target_exits {
            state.stop();
        }

        let entered_submenu = target.is_some_and(|t| t.item_type() == ItemType::Submenu);
        if state.exit_pending && !entered_submenu && !state.is_done() {
            state.finish(MenuResult::SelectedExit);
        }

        if !state.is_done() {
            state.set_state(EngineState::Browsing);
        }
        true
    }

    fn activate_target<'a>(
        &mut self,
        state: &mut MenuState<'a>,
        target: &'a MenuItem<'a>,
        selected: usize,
    ) {
        match target.kind {
            ItemKind::Submenu(_) => {
                if state.stack.push(state.menu, selected) {
                    state.menu = target;
                    self.load(state, 0, true);
                } else {
                    warn!("menu: navigation stack full, staying at depth {}", state.depth());
                }
            }
            ItemKind::Function(call) => {
                let param = target.flags.use_param.then_some(call.param);
                let value = call.function.call(param);
                if !state.menu.flags.exit_after_this_menu || target.flags.exit_after_this_menu {
                    self.load(state, selected, true);
                } else {
                    state.list_owned = false;
                }
                if target.flags.check_retval && value != 0 {
                    state.finish(MenuResult::Value(value));
                }
            }
            ItemKind::Setting(_) | ItemKind::SettingWithText(_) => {
                setting::do_setting_from_menu(&mut *self.host.settings, target);
                self.host.system.broadcast_redraw();
                self.load(state, selected, false);
            }
            ItemKind::StringList(_) => {
                if state.stack.push(state.menu, selected) {
                    state.menu = target;
                    self.load(state, 0, false);
                    state.in_string_list = true;
                } else {
                    warn!("menu: navigation stack full, staying at depth {}", state.depth());
                }
            }
            ItemKind::ReturnValue(value) => state.finish(MenuResult::Value(value)),
        }
    }

    /// Context request on the highlighted entry. Returns `true` when the
    /// list must be redrawn.
    fn context_menu(&mut self, state: &mut MenuState<'_>) -> bool {
        if self.is_main_menu(state.menu) {
            state.finish(MenuResult::RootItemContext);
            return false;
        }
        if state.in_string_list {
            return false;
        }
        let Some(selected) = self.selection(state) else {
            return false;
        };
        let Some(id) = state.menu.child(selected).and_then(|t| t.setting_id()) else {
            return false;
        };
        let Some(setting) = self.host.settings.find_setting(id) else {
            warn!("menu: context on unregistered setting {}", id.0);
            return false;
        };

        let quick_slots = self.config.quick_screen && self.host.settings.supports_quick_slots(&setting);
        let menu = context::build_context_menu(quick_slots);
        let mut choice = 0;
        state.list_owned = false;
        if let MenuResult::Selected(index) = self.do_menu(&menu, Some(&mut choice)) {
            if let Some(choice) = ContextChoice::from_index(index, quick_slots) {
                info!("menu: {} on setting {}", choice, id.0);
                if let Err(e) = self.host.settings.apply_context_choice(choice, &setting) {
                    warn!("menu: applying {} failed: {}", choice, e);
                }
            }
        }
        self.load(state, selected, false);
        true
    }
}
