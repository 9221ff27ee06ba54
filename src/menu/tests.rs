//! Engine scenarios against a scripted host.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::action::{
    Action, CallbackOutcome, EventOutcome, MenuEvent, MenuResult, PlaybackStatus, SystemEvent,
};
use crate::config::{MenuConfig, MAX_MENUS};
use crate::error::Error;
use crate::host::{
    ActionSource, Collaborators, ListItems, SelectionList, SettingStore, SystemHooks, Voice,
};
use crate::settings::{QuickSlot, SettingDescriptor, SettingId};
use crate::ui::input_logic::{page_down, page_up, select_next, select_prev};

use super::*;

// ═══════════════════════════════════════════════════════════════════════════
// Mock host
// ═══════════════════════════════════════════════════════════════════════════

struct Script(VecDeque<Action>);

impl ActionSource for Script {
    fn next_action(&mut self, _timeout_ms: u32) -> Action {
        self.0.pop_front().expect("action script exhausted")
    }
}

#[derive(Default)]
struct ListLog {
    count: usize,
    selected: usize,
    title: String,
    inits: Vec<(String, usize)>,
    draws: usize,
    drawn_selection: Vec<usize>,
    names: Vec<String>,
    icons: Vec<Icon>,
    spoken: Vec<String>,
}

impl SelectionList for ListLog {
    fn init(&mut self, count: usize, title: &str, _icon: Icon) {
        self.count = count;
        self.selected = 0;
        self.title = title.into();
        self.inits.push((title.into(), count));
    }

    fn selected(&self) -> usize {
        self.selected
    }

    fn select(&mut self, pos: usize) {
        self.selected = pos;
    }

    fn handle_action(&mut self, action: Action) -> bool {
        self.selected = match action {
            Action::Up => select_prev(self.selected, self.count),
            Action::Down => select_next(self.selected, self.count),
            Action::PageUp => page_up(self.selected, 5),
            Action::PageDown => page_down(self.selected, self.count, 5),
            _ => return false,
        };
        true
    }

    fn draw(&mut self, items: &dyn ListItems) {
        self.draws += 1;
        self.drawn_selection.push(self.selected);
        self.names = (0..items.count())
            .map(|pos| {
                let mut buf = NameBuf::new();
                items.name(pos, &mut buf);
                String::from(buf.as_str())
            })
            .collect();
        self.icons = (0..items.count()).map(|pos| items.icon(pos)).collect();
    }

    fn announce(&mut self, items: &dyn ListItems) {
        match items.voice(self.selected) {
            Voice::Silent => {}
            voice => self.spoken.push(format!("{:?}", voice)),
        }
    }
}

const VOLUME: SettingDescriptor = SettingDescriptor::new(SettingId(1), "Volume", "volume");
const BALANCE: SettingDescriptor = SettingDescriptor::new(SettingId(2), "Balance", "balance");

#[derive(Default)]
struct Settings {
    quick_slots: bool,
    fail: bool,
    edited: Vec<(SettingId, String)>,
    applied: Vec<(ContextChoice, SettingId)>,
}

impl SettingStore for Settings {
    fn find_setting(&self, id: SettingId) -> Option<SettingDescriptor> {
        [VOLUME, BALANCE].into_iter().find(|s| s.id == id)
    }

    fn edit_setting(&mut self, setting: &SettingDescriptor, title: &str) {
        self.edited.push((setting.id, title.into()));
    }

    fn supports_quick_slots(&self, _setting: &SettingDescriptor) -> bool {
        self.quick_slots
    }

    fn apply_context_choice(
        &mut self,
        choice: ContextChoice,
        setting: &SettingDescriptor,
    ) -> Result<(), Error> {
        self.applied.push((choice, setting.id));
        if self.fail {
            Err(Error::Storage)
        } else {
            Ok(())
        }
    }
}

struct System {
    status: Rc<Cell<PlaybackStatus>>,
    quick_screens: usize,
    stops: usize,
    broadcasts: usize,
}

impl System {
    fn new() -> Self {
        Self {
            status: Rc::new(Cell::new(PlaybackStatus::Stopped)),
            quick_screens: 0,
            stops: 0,
            broadcasts: 0,
        }
    }
}

impl SystemHooks for System {
    fn playback_status(&self) -> PlaybackStatus {
        self.status.get()
    }

    fn quick_screen(&mut self, _action: Action) {
        self.quick_screens += 1;
    }

    fn stop_playback(&mut self) -> bool {
        self.stops += 1;
        let was_playing = self.status.get() != PlaybackStatus::Stopped;
        self.status.set(PlaybackStatus::Stopped);
        was_playing
    }

    fn default_event(&mut self, action: Action) -> EventOutcome {
        match action {
            Action::System(SystemEvent::UsbConnected) => EventOutcome::UsbConnected,
            Action::System(SystemEvent::CallHungUp) => EventOutcome::Redraw,
            _ => EventOutcome::Ignored,
        }
    }

    fn broadcast_redraw(&mut self) {
        self.broadcasts += 1;
    }
}

struct Host {
    input: Script,
    list: ListLog,
    settings: Settings,
    system: System,
}

impl Host {
    fn new(actions: &[Action]) -> Self {
        Self {
            input: Script(actions.iter().copied().collect()),
            list: ListLog::default(),
            settings: Settings::default(),
            system: System::new(),
        }
    }

    fn collaborators(&mut self) -> Collaborators<'_> {
        Collaborators {
            input: &mut self.input,
            list: &mut self.list,
            settings: &mut self.settings,
            system: &mut self.system,
        }
    }

    fn run<'a>(&mut self, start: &'a MenuItem<'a>) -> MenuResult {
        self.run_with(MenuConfig::new(), start, None)
    }

    fn run_with<'a>(
        &mut self,
        config: MenuConfig<'_>,
        start: &'a MenuItem<'a>,
        selected: Option<&mut usize>,
    ) -> MenuResult {
        MenuEngine::new(self.collaborators(), config).do_menu(start, selected)
    }

    fn script_done(&self) -> bool {
        self.input.0.is_empty()
    }
}

/// Answers `outcome` to one kind of event and proceeds otherwise.
struct On {
    event: MenuEvent,
    outcome: CallbackOutcome,
}

impl MenuCallback for On {
    fn on_action(&self, event: MenuEvent, _ctx: ItemContext<'_>) -> CallbackOutcome {
        if event == self.event {
            self.outcome
        } else {
            CallbackOutcome::Proceed
        }
    }
}

#[derive(Default)]
struct Events(RefCell<Vec<MenuEvent>>);

impl MenuCallback for Events {
    fn on_action(&self, event: MenuEvent, _ctx: ItemContext<'_>) -> CallbackOutcome {
        self.0.borrow_mut().push(event);
        CallbackOutcome::Proceed
    }
}

/// Events other than visibility requests, in order.
fn seen(events: &Events) -> Vec<MenuEvent> {
    events
        .0
        .borrow()
        .iter()
        .copied()
        .filter(|e| *e != MenuEvent::RequestVisibility)
        .collect()
}

/// Submenu chain `L0 → L1 → … → L{depth-1} → end`.
fn chain(depth: usize) -> &'static MenuItem<'static> {
    let mut menu: &'static MenuItem<'static> =
        Box::leak(Box::new(MenuItem::return_value("end", 0)));
    for level in (0..depth).rev() {
        let name: &'static str = Box::leak(format!("L{}", level).into_boxed_str());
        let children: &'static [&'static MenuItem<'static>] = Box::leak(Box::new([menu]));
        menu = Box::leak(Box::new(MenuItem::submenu(name, children)));
    }
    menu
}

// ═══════════════════════════════════════════════════════════════════════════
// Listing and navigation
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn vetoed_children_are_never_listed_or_reached() {
    let hide = On {
        event: MenuEvent::RequestVisibility,
        outcome: CallbackOutcome::Veto,
    };
    let a = MenuItem::return_value("A", 1);
    let hidden = MenuItem::return_value("Hidden", 2).with_callback(&hide);
    let c = MenuItem::return_value("C", 3);
    let children = [&a, &hidden, &c];
    let root = MenuItem::submenu("Root", &children);

    let mut host = Host::new(&[Action::Down, Action::Down, Action::Ok]);
    assert_eq!(host.run(&root), MenuResult::Value(1));
    assert_eq!(host.list.inits[0], (String::from("Root"), 2));
    assert_eq!(host.list.names, ["A", "C"]);

    let mut host = Host::new(&[Action::Down, Action::Ok]);
    assert_eq!(host.run(&root), MenuResult::Value(3));
}

#[test]
fn enter_and_leave_submenu_restores_selection() {
    let leaf = MenuItem::return_value("leaf", 0);
    let leaves = [&leaf];
    let a = MenuItem::submenu("A", &leaves);
    let b = MenuItem::submenu("B", &leaves);
    let c = MenuItem::submenu("C", &leaves);
    let children = [&a, &b, &c];
    let root = MenuItem::submenu("Root", &children);

    let mut host = Host::new(&[]);
    let mut engine = MenuEngine::new(host.collaborators(), MenuConfig::new());
    let mut state = engine.enter(&root, 0);
    assert_eq!(state.state(), EngineState::Browsing);

    engine.step(&mut state, Action::Down);
    engine.step(&mut state, Action::Ok);
    assert_eq!(state.depth(), 1);
    assert_eq!(state.menu().text(), Some("B"));

    engine.step(&mut state, Action::Cancel);
    assert_eq!(state.depth(), 0);
    assert_eq!(state.menu().text(), Some("Root"));
    assert!(!state.is_done());

    engine.step(&mut state, Action::Cancel);
    assert!(state.is_done());
    let mut selected = 0;
    assert_eq!(engine.leave(&state, Some(&mut selected)), MenuResult::GoToPrevious);
    assert_eq!(selected, 1);
    drop(engine);

    assert_eq!(host.list.title, "Root");
    assert_eq!(host.list.selected, 1);
}

#[test]
fn start_selection_is_highlighted_and_reported_from_the_root() {
    let leaf = MenuItem::return_value("leaf", 0);
    let leaves = [&leaf];
    let a = MenuItem::submenu("A", &leaves);
    let b = MenuItem::submenu("B", &leaves);
    let c = MenuItem::submenu("C", &leaves);
    let children = [&a, &b, &c];
    let root = MenuItem::submenu("Root", &children);

    let mut host = Host::new(&[Action::Down, Action::Ok, Action::Menu]);
    let mut selected = 1;
    let result = host.run_with(MenuConfig::new(), &root, Some(&mut selected));
    assert_eq!(result, MenuResult::GoToRoot);
    assert_eq!(selected, 2);
    assert_eq!(host.list.drawn_selection[0], 1);
}

#[test]
fn unknown_start_selection_falls_back_to_first_entry() {
    let a = MenuItem::return_value("A", 1);
    let b = MenuItem::return_value("B", 2);
    let children = [&a, &b];
    let root = MenuItem::submenu("Root", &children);

    let mut host = Host::new(&[Action::Ok]);
    let mut selected = 40;
    assert_eq!(
        host.run_with(MenuConfig::new(), &root, Some(&mut selected)),
        MenuResult::Value(1)
    );
    assert_eq!(selected, 0);
}

#[test]
fn push_beyond_capacity_stays_put() {
    let root = chain(MAX_MENUS + 2);
    let mut host = Host::new(&[]);
    let mut engine = MenuEngine::new(host.collaborators(), MenuConfig::new());
    let mut state = engine.enter(root, 0);

    for _ in 0..MAX_MENUS {
        engine.step(&mut state, Action::Ok);
    }
    assert_eq!(state.depth(), MAX_MENUS);
    assert_eq!(state.menu().text(), Some("L8"));

    engine.step(&mut state, Action::Ok);
    assert_eq!(state.depth(), MAX_MENUS);
    assert_eq!(state.menu().text(), Some("L8"));
    assert!(!state.is_done());
}

#[test]
fn redraw_twice_gives_the_same_list() {
    let redraw = On {
        event: MenuEvent::Action(Action::None),
        outcome: CallbackOutcome::Redraw,
    };
    let a = MenuItem::return_value("A", 1);
    let b = MenuItem::return_value("B", 2);
    let children = [&a, &b];
    let root = MenuItem::submenu("Root", &children).with_callback(&redraw);

    let mut host = Host::new(&[]);
    let mut engine = MenuEngine::new(host.collaborators(), MenuConfig::new());
    let mut state = engine.enter(&root, 1);
    engine.step(&mut state, Action::None);
    let first = state.visible().clone();
    engine.step(&mut state, Action::None);
    assert_eq!(state.visible(), &first);
    drop(engine);

    assert_eq!(host.list.draws, 3);
    assert_eq!(host.list.drawn_selection, [1, 1, 1]);
}

#[test]
fn empty_list_ignores_ok() {
    let hide = On {
        event: MenuEvent::RequestVisibility,
        outcome: CallbackOutcome::Veto,
    };
    let a = MenuItem::return_value("A", 1).with_callback(&hide);
    let children = [&a];
    let root = MenuItem::submenu("Root", &children);

    let mut host = Host::new(&[Action::Ok, Action::Cancel]);
    assert_eq!(host.run(&root), MenuResult::GoToPrevious);
    assert_eq!(host.list.count, 0);
    assert!(host.script_done());
}

// ═══════════════════════════════════════════════════════════════════════════
// Activation
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn checked_return_value_ends_menu() {
    let seven = |_: Option<usize>| 7;
    let f = MenuItem::function("Seven", &seven).check_retval();
    let children = [&f];
    let menu = MenuItem::submenu("M", &children).exit_after_this_menu();

    let mut host = Host::new(&[Action::Ok]);
    assert_eq!(host.run(&menu), MenuResult::Value(7));

    let plain = MenuItem::submenu("M", &children);
    let mut host = Host::new(&[Action::Ok]);
    assert_eq!(host.run(&plain), MenuResult::Value(7));
}

#[test]
fn zero_return_in_exit_after_menu_just_exits() {
    let zero = |_: Option<usize>| 0;
    let f = MenuItem::function("Zero", &zero).check_retval();
    let children = [&f];
    let menu = MenuItem::submenu("M", &children).exit_after_this_menu();

    let mut host = Host::new(&[Action::Ok]);
    assert_eq!(host.run(&menu), MenuResult::Exited);
}

#[test]
fn function_parameter_is_passed_only_when_bound() {
    let seen = Cell::new(None);
    let calls = Cell::new(0);
    let record = |p: Option<usize>| {
        seen.set(p);
        calls.set(calls.get() + 1);
        0
    };
    let with = MenuItem::function_with_param("With", &record, 42);
    let without = MenuItem::function("Without", &record);
    let children = [&with, &without];
    let menu = MenuItem::submenu("M", &children);

    let mut host = Host::new(&[Action::Ok, Action::Cancel]);
    assert_eq!(host.run(&menu), MenuResult::GoToPrevious);
    assert_eq!(seen.get(), Some(42));

    let mut host = Host::new(&[Action::Down, Action::Ok, Action::Cancel]);
    assert_eq!(host.run(&menu), MenuResult::GoToPrevious);
    assert_eq!(seen.get(), None);
    assert_eq!(calls.get(), 2);
    assert_eq!(host.list.inits.len(), 2);
}

#[test]
fn standalone_string_list_returns_index() {
    let list = MenuItem::string_list("Mode", &["Off", "On"]);
    let mut host = Host::new(&[Action::Down, Action::Ok]);
    let mut selected = 0;
    assert_eq!(
        host.run_with(MenuConfig::new(), &list, Some(&mut selected)),
        MenuResult::Selected(1)
    );
    assert_eq!(selected, 1);
    assert_eq!(host.list.names, ["Off", "On"]);
    assert_eq!(host.list.icons, [Icon::FunctionCall, Icon::FunctionCall]);
}

#[test]
fn string_list_child_is_entered_then_answers() {
    let repeat = MenuItem::string_list("Repeat", &["Off", "All", "One"]);
    let children = [&repeat];
    let root = MenuItem::submenu("Playback", &children);

    let mut host = Host::new(&[]);
    let mut engine = MenuEngine::new(host.collaborators(), MenuConfig::new());
    let mut state = engine.enter(&root, 0);
    engine.step(&mut state, Action::Ok);
    assert!(state.in_string_list());
    assert_eq!(state.depth(), 1);

    engine.step(&mut state, Action::Cancel);
    assert!(!state.in_string_list());
    assert_eq!(state.menu().text(), Some("Playback"));

    engine.step(&mut state, Action::Ok);
    engine.step(&mut state, Action::Down);
    engine.step(&mut state, Action::Down);
    engine.step(&mut state, Action::Ok);
    assert_eq!(state.result(), MenuResult::Selected(2));
    assert!(state.is_done());
}

#[test]
fn setting_leaf_opens_editor_and_broadcasts() {
    let volume = MenuItem::setting(SettingId(1));
    let balance = MenuItem::setting_with_text(SettingId(2), "Left/Right");
    let children = [&volume, &balance];
    let sound = MenuItem::submenu("Sound", &children);

    let mut host = Host::new(&[Action::Ok, Action::Down, Action::Ok, Action::Cancel]);
    assert_eq!(host.run(&sound), MenuResult::GoToPrevious);
    assert_eq!(
        host.settings.edited,
        [(SettingId(1), String::from("Volume")), (SettingId(2), String::from("Left/Right"))]
    );
    assert_eq!(host.system.broadcasts, 2);
    assert_eq!(host.list.title, "Sound");
    assert_eq!(host.list.names, ["Volume", "Balance"]);
}

#[test]
fn enter_veto_leaves_the_loop() {
    let guard = On {
        event: MenuEvent::Enter,
        outcome: CallbackOutcome::Veto,
    };
    let calls = Cell::new(0);
    let f = |_: Option<usize>| {
        calls.set(calls.get() + 1);
        0
    };
    let locked = MenuItem::function("Locked", &f).with_callback(&guard);
    let children = [&locked];
    let menu = MenuItem::submenu("M", &children);

    let mut host = Host::new(&[Action::Ok]);
    assert_eq!(host.run(&menu), MenuResult::Exited);
    assert_eq!(calls.get(), 0);
}

#[test]
fn target_sees_enter_then_exit() {
    let events = Events::default();
    let f = |_: Option<usize>| 0;
    let item = MenuItem::function("F", &f).with_callback(&events);
    let children = [&item];
    let menu = MenuItem::submenu("M", &children);

    let mut host = Host::new(&[Action::Ok, Action::Cancel]);
    host.run(&menu);
    assert_eq!(seen(&events), [MenuEvent::Enter, MenuEvent::Exit]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Menu callbacks on actions
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn vetoed_action_is_swallowed() {
    let swallow = On {
        event: MenuEvent::Action(Action::Ok),
        outcome: CallbackOutcome::Veto,
    };
    let a = MenuItem::return_value("A", 1);
    let children = [&a];
    let menu = MenuItem::submenu("M", &children).with_callback(&swallow);

    let mut host = Host::new(&[Action::Ok, Action::Cancel]);
    assert_eq!(host.run(&menu), MenuResult::GoToPrevious);
}

#[test]
fn substituted_action_is_dispatched() {
    let remap = On {
        event: MenuEvent::Action(Action::Ok),
        outcome: CallbackOutcome::Substitute(Action::Wps),
    };
    let a = MenuItem::return_value("A", 1);
    let children = [&a];
    let menu = MenuItem::submenu("M", &children).with_callback(&remap);

    let mut host = Host::new(&[Action::Ok]);
    assert_eq!(host.run(&menu), MenuResult::GoToPreviousMusic);
}

#[test]
fn exit_after_this_item_ends_after_activation() {
    let once = On {
        event: MenuEvent::Action(Action::Ok),
        outcome: CallbackOutcome::ExitAfterThisItem,
    };
    let calls = Cell::new(0);
    let f = |_: Option<usize>| {
        calls.set(calls.get() + 1);
        0
    };
    let item = MenuItem::function("F", &f);
    let children = [&item];
    let menu = MenuItem::submenu("M", &children).with_callback(&once);

    let mut host = Host::new(&[Action::Ok]);
    assert_eq!(host.run(&menu), MenuResult::SelectedExit);
    assert_eq!(calls.get(), 1);
}

#[test]
fn exit_request_is_kept_when_an_exit_after_menu_stops() {
    let once = On {
        event: MenuEvent::Action(Action::Ok),
        outcome: CallbackOutcome::ExitAfterThisItem,
    };
    let zero = |_: Option<usize>| 0;
    let f = MenuItem::function("Zero", &zero);
    let children = [&f];
    let menu = MenuItem::submenu("M", &children)
        .exit_after_this_menu()
        .with_callback(&once);

    let mut host = Host::new(&[Action::Ok]);
    assert_eq!(host.run(&menu), MenuResult::SelectedExit);
}

#[test]
fn exit_request_is_kept_when_the_target_vetoes_enter() {
    let once = On {
        event: MenuEvent::Action(Action::Ok),
        outcome: CallbackOutcome::ExitAfterThisItem,
    };
    let guard = On {
        event: MenuEvent::Enter,
        outcome: CallbackOutcome::Veto,
    };
    let locked = MenuItem::return_value("Locked", 5).with_callback(&guard);
    let children = [&locked];
    let menu = MenuItem::submenu("M", &children).with_callback(&once);

    let mut host = Host::new(&[Action::Ok]);
    assert_eq!(host.run(&menu), MenuResult::SelectedExit);
}

#[test]
fn later_result_replaces_an_exit_request() {
    let arm = On {
        event: MenuEvent::Action(Action::Down),
        outcome: CallbackOutcome::ExitAfterThisItem,
    };
    let a = MenuItem::return_value("A", 1);
    let b = MenuItem::return_value("B", 2);
    let children = [&a, &b];
    let menu = MenuItem::submenu("M", &children).with_callback(&arm);

    let mut host = Host::new(&[Action::Down, Action::Cancel]);
    assert_eq!(host.run(&menu), MenuResult::GoToPrevious);

    let mut host = Host::new(&[Action::Down, Action::Ok]);
    assert_eq!(host.run(&menu), MenuResult::Value(2));
}

// ═══════════════════════════════════════════════════════════════════════════
// Notifications to the current menu
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn submenu_sees_enter_redraw_and_exit() {
    let events = Events::default();
    let a = MenuItem::return_value("A", 1);
    let b = MenuItem::return_value("B", 2);
    let leaves = [&a, &b];
    let sub = MenuItem::submenu("Sub", &leaves).with_callback(&events);
    let children = [&sub];
    let root = MenuItem::submenu("Root", &children);

    let mut host = Host::new(&[]);
    let mut engine = MenuEngine::new(host.collaborators(), MenuConfig::new());
    let mut state = engine.enter(&root, 0);

    // Enter as the activation target, then again when loaded.
    engine.step(&mut state, Action::Ok);
    assert_eq!(state.menu().text(), Some("Sub"));
    assert_eq!(
        seen(&events),
        [MenuEvent::Enter, MenuEvent::Enter, MenuEvent::Redraw]
    );

    // Cursor moves are handled by the list and need no redraw.
    events.0.borrow_mut().clear();
    engine.step(&mut state, Action::Down);
    assert_eq!(seen(&events), [MenuEvent::Action(Action::Down)]);

    events.0.borrow_mut().clear();
    let hung_up = Action::System(SystemEvent::CallHungUp);
    engine.step(&mut state, hung_up);
    assert_eq!(seen(&events), [MenuEvent::Action(hung_up), MenuEvent::Redraw]);

    // The parent is redrawn after the pop, not the submenu.
    events.0.borrow_mut().clear();
    engine.step(&mut state, Action::Cancel);
    assert_eq!(state.menu().text(), Some("Root"));
    assert_eq!(
        seen(&events),
        [MenuEvent::Action(Action::Cancel), MenuEvent::Exit]
    );
}

#[test]
fn no_redraw_once_the_menu_is_done() {
    let events = Events::default();
    let a = MenuItem::return_value("A", 1);
    let children = [&a];
    let menu = MenuItem::submenu("M", &children).with_callback(&events);

    let mut host = Host::new(&[Action::Ok]);
    assert_eq!(host.run(&menu), MenuResult::Value(1));
    assert_eq!(
        seen(&events),
        [MenuEvent::Enter, MenuEvent::Action(Action::Ok)]
    );

    events.0.borrow_mut().clear();
    let mut host = Host::new(&[Action::Wps]);
    assert_eq!(host.run(&menu), MenuResult::GoToPreviousMusic);
    assert_eq!(
        seen(&events),
        [MenuEvent::Enter, MenuEvent::Action(Action::Wps)]
    );
}

#[test]
fn outermost_menu_is_reentered_when_reporting_its_selection() {
    let events = Events::default();
    let leaf = MenuItem::return_value("leaf", 9);
    let leaves = [&leaf];
    let first = MenuItem::return_value("First", 1);
    let sub = MenuItem::submenu("Sub", &leaves);
    let children = [&first, &sub];
    let root = MenuItem::submenu("Root", &children).with_callback(&events);

    let mut selected = 1;
    let mut host = Host::new(&[Action::Ok, Action::Ok]);
    let result = host.run_with(MenuConfig::new(), &root, Some(&mut selected));
    assert_eq!(result, MenuResult::Value(9));
    assert_eq!(selected, 1);
    assert_eq!(
        seen(&events),
        [MenuEvent::Enter, MenuEvent::Action(Action::Ok), MenuEvent::Enter]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Cancel and exit-after menus
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn cancel_on_main_menu_is_ignored() {
    let a = MenuItem::return_value("A", 1);
    let children = [&a];
    let main = MenuItem::submenu("Main", &children);
    let config = MenuConfig::new().with_main_menu(&main);

    let mut host = Host::new(&[Action::Cancel, Action::Menu]);
    assert_eq!(host.run_with(config, &main, None), MenuResult::GoToPrevious);
    assert!(host.script_done());
}

#[test]
fn cancel_in_exit_after_submenu_stops() {
    let leaf = MenuItem::return_value("leaf", 0);
    let leaves = [&leaf];
    let sticky = MenuItem::submenu("Sticky", &leaves).exit_after_this_menu();
    let children = [&sticky];
    let root = MenuItem::submenu("Root", &children);

    let mut host = Host::new(&[Action::Ok, Action::Cancel]);
    assert_eq!(host.run(&root), MenuResult::Exited);
}

#[test]
fn leaving_a_submenu_into_exit_after_parent_reloads_it() {
    let leaf = MenuItem::return_value("leaf", 0);
    let leaves = [&leaf];
    let child = MenuItem::submenu("Child", &leaves);
    let children = [&child];
    let parent = MenuItem::submenu("Parent", &children).exit_after_this_menu();

    let mut host = Host::new(&[]);
    let mut engine = MenuEngine::new(host.collaborators(), MenuConfig::new());
    let mut state = engine.enter(&parent, 0);
    engine.step(&mut state, Action::Ok);
    assert_eq!(state.menu().text(), Some("Child"));
    engine.step(&mut state, Action::Cancel);
    assert!(!state.is_done());
    assert_eq!(state.menu().text(), Some("Parent"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Global actions and system events
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn global_actions_map_to_results() {
    let a = MenuItem::return_value("A", 1);
    let children = [&a];
    let menu = MenuItem::submenu("M", &children);

    for (action, expected) in [
        (Action::Wps, MenuResult::GoToPreviousMusic),
        (Action::Record, MenuResult::GoToRecording),
        (Action::Menu, MenuResult::GoToRoot),
        (Action::System(SystemEvent::UsbConnected), MenuResult::UsbAttached),
    ] {
        let mut host = Host::new(&[action]);
        assert_eq!(host.run(&menu), expected, "{:?}", action);
    }

    let config = MenuConfig::new().with_main_menu(&menu);
    let mut host = Host::new(&[Action::Context]);
    assert_eq!(host.run_with(config, &menu, None), MenuResult::RootItemContext);
}

#[test]
fn quick_screen_and_stop_go_to_system_hooks() {
    let a = MenuItem::return_value("A", 1);
    let children = [&a];
    let menu = MenuItem::submenu("M", &children);

    let mut host = Host::new(&[Action::QuickScreen, Action::Stop, Action::Cancel]);
    host.system.status.set(PlaybackStatus::Playing);
    assert_eq!(host.run(&menu), MenuResult::GoToPrevious);
    assert_eq!(host.system.quick_screens, 1);
    assert_eq!(host.system.stops, 1);
    assert_eq!(host.list.draws, 3);

    let config = MenuConfig::new().with_quick_screen(false);
    let mut host = Host::new(&[Action::QuickScreen, Action::Cancel]);
    assert_eq!(host.run_with(config, &menu, None), MenuResult::GoToPrevious);
    assert_eq!(host.system.quick_screens, 0);
}

#[test]
fn system_redraw_and_playback_change_redraw() {
    let a = MenuItem::return_value("A", 1);
    let children = [&a];
    let menu = MenuItem::submenu("M", &children);

    let mut host = Host::new(&[]);
    let status = host.system.status.clone();
    let mut engine = MenuEngine::new(host.collaborators(), MenuConfig::new());
    let mut state = engine.enter(&menu, 0);
    engine.step(&mut state, Action::None);
    status.set(PlaybackStatus::Playing);
    engine.step(&mut state, Action::None);
    engine.step(&mut state, Action::System(SystemEvent::CallHungUp));
    engine.step(&mut state, Action::System(SystemEvent::PlayPause));
    drop(engine);

    assert_eq!(host.list.draws, 3);
}

#[test]
fn talk_menu_announces_entries() {
    let a = MenuItem::return_value("A", 1);
    let volume = MenuItem::setting(SettingId(1));
    let children = [&a, &volume];
    let menu = MenuItem::submenu("M", &children);

    let actions = [
        Action::Down,
        Action::System(SystemEvent::CallHungUp),
        Action::Cancel,
    ];
    let mut host = Host::new(&actions);
    host.run_with(MenuConfig::new().with_talk(true), &menu, None);
    assert_eq!(host.list.spoken, ["Label(\"A\")", "Setting(SettingId(1))"]);

    let mut host = Host::new(&actions);
    host.run(&menu);
    assert!(host.list.spoken.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Context menu
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn context_reset_applies_once_and_keeps_selection() {
    let a = MenuItem::return_value("A", 1);
    let volume = MenuItem::setting(SettingId(1));
    let children = [&a, &volume];
    let sound = MenuItem::submenu("Sound", &children);

    let mut host = Host::new(&[Action::Down, Action::Context, Action::Ok, Action::Cancel]);
    let mut selected = 0;
    let result = host.run_with(MenuConfig::new(), &sound, Some(&mut selected));
    assert_eq!(result, MenuResult::GoToPrevious);
    assert_eq!(selected, 1);
    assert_eq!(host.settings.applied, [(ContextChoice::Reset, SettingId(1))]);
    assert_eq!(host.list.inits[1], (String::from(context::CONTEXT_MENU_TITLE), 1));
    assert_eq!(host.list.title, "Sound");
    assert_eq!(host.list.drawn_selection.last(), Some(&1));
}

#[test]
fn context_offers_quick_slots_when_supported() {
    let volume = MenuItem::setting(SettingId(1));
    let children = [&volume];
    let sound = MenuItem::submenu("Sound", &children);

    let mut actions = vec![Action::Context];
    actions.extend([Action::Down; 4]);
    actions.extend([Action::Ok, Action::Cancel]);
    let mut host = Host::new(&actions);
    host.settings.quick_slots = true;
    assert_eq!(host.run(&sound), MenuResult::GoToPrevious);
    assert_eq!(host.list.inits[1].1, 6);
    assert_eq!(
        host.settings.applied,
        [(ContextChoice::QuickSlot(QuickSlot::Right), SettingId(1))]
    );

    let mut host = Host::new(&[Action::Context, Action::Cancel, Action::Cancel]);
    host.settings.quick_slots = true;
    let config = MenuConfig::new().with_quick_screen(false);
    assert_eq!(host.run_with(config, &sound, None), MenuResult::GoToPrevious);
    assert_eq!(host.list.inits[1].1, 1);
    assert!(host.settings.applied.is_empty());
}

#[test]
fn context_ignores_non_settings_and_store_errors() {
    let a = MenuItem::return_value("A", 1);
    let volume = MenuItem::setting(SettingId(1));
    let unknown = MenuItem::setting(SettingId(9));
    let children = [&a, &volume, &unknown];
    let menu = MenuItem::submenu("M", &children);

    let mut host = Host::new(&[
        Action::Context,
        Action::Up,
        Action::Context,
        Action::Up,
        Action::Context,
        Action::Ok,
        Action::Cancel,
    ]);
    host.settings.fail = true;
    assert_eq!(host.run(&menu), MenuResult::GoToPrevious);
    assert_eq!(host.settings.applied, [(ContextChoice::Reset, SettingId(1))]);
    assert_eq!(host.list.inits.len(), 3);
    assert!(host.script_done());
}
