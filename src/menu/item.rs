//! Menu item model.
//!
//! A menu is a tree of read-only [`MenuItem`] descriptors owned by the
//! caller. Every constructor is a `const fn`, so trees are usually spelled
//! out as constants:
//!
//! ```
//! use menunav::menu::MenuItem;
//! use menunav::settings::SettingId;
//!
//! const VOLUME: MenuItem<'static> = MenuItem::setting(SettingId(1));
//! const BACK: MenuItem<'static> = MenuItem::return_value("Back", 1);
//! const SOUND: MenuItem<'static> = MenuItem::submenu("Sound", &[&VOLUME, &BACK]);
//! assert_eq!(SOUND.child_count(), 2);
//! ```

use crate::action::{CallbackOutcome, MenuEvent};
use crate::config::NAME_LEN;
use crate::settings::SettingId;

/// Buffer a dynamic name provider renders into.
pub type NameBuf = heapless::String<NAME_LEN>;

/// Icons the list adapter knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    NoIcon,
    Submenu,
    SubmenuEntered,
    Setting,
    FunctionCall,
    /// Theme-specific icon id.
    Custom(u16),
}

/// Per-item hook consulted by the engine.
///
/// Items are shared and read-only, so implementations that keep state use
/// interior mutability.
pub trait MenuCallback {
    fn on_action(&self, event: MenuEvent, ctx: ItemContext<'_>) -> CallbackOutcome;
}

/// What a callback is being asked about.
#[derive(Clone, Copy)]
pub enum ItemContext<'r> {
    Item(&'r MenuItem<'r>),
    /// Entry of a string list.
    Index(usize),
}

/// Callback of items that did not register one.
pub struct NoCallback;

impl MenuCallback for NoCallback {
    fn on_action(&self, _event: MenuEvent, _ctx: ItemContext<'_>) -> CallbackOutcome {
        CallbackOutcome::Proceed
    }
}

static NO_CALLBACK: NoCallback = NoCallback;

/// Renders names of dynamically described items.
pub trait NameProvider {
    /// Write the name of entry `index` into `buf`. `None` asks for the
    /// title of the menu itself.
    fn name(&self, index: Option<usize>, buf: &mut NameBuf);

    /// Speak entry `index` directly. Returns `false` to have the rendered
    /// name spoken instead.
    fn speak(&self, _index: usize) -> bool {
        false
    }
}

/// Bound function of a function-call item.
pub trait MenuFunction {
    fn call(&self, param: Option<usize>) -> i32;
}

impl<F: Fn(Option<usize>) -> i32> MenuFunction for F {
    fn call(&self, param: Option<usize>) -> i32 {
        self(param)
    }
}

#[derive(Clone, Copy)]
pub struct FunctionCall<'a> {
    pub function: &'a dyn MenuFunction,
    /// Passed only when the item has [`ItemFlags::use_param`] set.
    pub param: usize,
}

/// Where an item's display name comes from.
#[derive(Clone, Copy)]
pub enum Description<'a> {
    None,
    Static { text: &'a str, icon: Icon },
    Dynamic { provider: &'a dyn NameProvider, icon: Icon },
}

/// Behaviour toggles, independent of the item kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ItemFlags {
    /// Leave the menu once one of its items has been activated.
    pub exit_after_this_menu: bool,
    /// Pass the bound parameter to the function.
    pub use_param: bool,
    /// A non-zero function result ends the menu with that value.
    pub check_retval: bool,
}

impl ItemFlags {
    pub const NONE: ItemFlags = ItemFlags {
        exit_after_this_menu: false,
        use_param: false,
        check_retval: false,
    };
}

#[derive(Clone, Copy)]
pub enum ItemKind<'a> {
    Submenu(&'a [&'a MenuItem<'a>]),
    Setting(SettingId),
    /// Setting whose editor title is the item's own text.
    SettingWithText(SettingId),
    Function(FunctionCall<'a>),
    ReturnValue(i32),
    StringList(&'a [&'a str]),
}

/// Discriminant of [`ItemKind`], handy for logging and comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ItemType {
    Submenu,
    Setting,
    SettingWithText,
    Function,
    ReturnValue,
    StringList,
}

/// One navigable entity.
#[derive(Clone, Copy)]
pub struct MenuItem<'a> {
    pub kind: ItemKind<'a>,
    pub desc: Description<'a>,
    pub callback: Option<&'a dyn MenuCallback>,
    pub flags: ItemFlags,
}

impl<'a> MenuItem<'a> {
    const fn with_kind(kind: ItemKind<'a>, desc: Description<'a>) -> Self {
        Self {
            kind,
            desc,
            callback: None,
            flags: ItemFlags::NONE,
        }
    }

    pub const fn submenu(title: &'a str, children: &'a [&'a MenuItem<'a>]) -> Self {
        Self::with_kind(
            ItemKind::Submenu(children),
            Description::Static { text: title, icon: Icon::NoIcon },
        )
    }

    /// Setting leaf, listed under the setting's own name.
    pub const fn setting(id: SettingId) -> Self {
        Self::with_kind(ItemKind::Setting(id), Description::None)
    }

    /// Setting leaf whose editor uses `title` instead of the setting name.
    pub const fn setting_with_text(id: SettingId, title: &'a str) -> Self {
        Self::with_kind(
            ItemKind::SettingWithText(id),
            Description::Static { text: title, icon: Icon::NoIcon },
        )
    }

    pub const fn function(name: &'a str, function: &'a dyn MenuFunction) -> Self {
        Self::with_kind(
            ItemKind::Function(FunctionCall { function, param: 0 }),
            Description::Static { text: name, icon: Icon::NoIcon },
        )
    }

    /// Function item called with `param`.
    pub const fn function_with_param(
        name: &'a str,
        function: &'a dyn MenuFunction,
        param: usize,
    ) -> Self {
        let mut item = Self::with_kind(
            ItemKind::Function(FunctionCall { function, param }),
            Description::Static { text: name, icon: Icon::NoIcon },
        );
        item.flags.use_param = true;
        item
    }

    pub const fn return_value(name: &'a str, value: i32) -> Self {
        Self::with_kind(
            ItemKind::ReturnValue(value),
            Description::Static { text: name, icon: Icon::NoIcon },
        )
    }

    pub const fn string_list(title: &'a str, labels: &'a [&'a str]) -> Self {
        Self::with_kind(
            ItemKind::StringList(labels),
            Description::Static { text: title, icon: Icon::NoIcon },
        )
    }

    pub const fn with_callback(mut self, callback: &'a dyn MenuCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub const fn with_icon(mut self, icon: Icon) -> Self {
        self.desc = match self.desc {
            Description::Static { text, .. } => Description::Static { text, icon },
            Description::Dynamic { provider, .. } => Description::Dynamic { provider, icon },
            Description::None => Description::Static { text: "", icon },
        };
        self
    }

    /// Replace the static description with a name provider.
    pub const fn with_dynamic_name(mut self, provider: &'a dyn NameProvider, icon: Icon) -> Self {
        self.desc = Description::Dynamic { provider, icon };
        self
    }

    pub const fn exit_after_this_menu(mut self) -> Self {
        self.flags.exit_after_this_menu = true;
        self
    }

    pub const fn check_retval(mut self) -> Self {
        self.flags.check_retval = true;
        self
    }

    pub const fn item_type(&self) -> ItemType {
        match self.kind {
            ItemKind::Submenu(_) => ItemType::Submenu,
            ItemKind::Setting(_) => ItemType::Setting,
            ItemKind::SettingWithText(_) => ItemType::SettingWithText,
            ItemKind::Function(_) => ItemType::Function,
            ItemKind::ReturnValue(_) => ItemType::ReturnValue,
            ItemKind::StringList(_) => ItemType::StringList,
        }
    }

    /// The registered callback, or one that always proceeds.
    pub fn callback(&self) -> &'a dyn MenuCallback {
        match self.callback {
            Some(callback) => callback,
            None => &NO_CALLBACK,
        }
    }

    /// Ask this item's callback about `event`, with the item as context.
    pub fn notify(&self, event: MenuEvent) -> CallbackOutcome {
        self.callback().on_action(event, ItemContext::Item(self))
    }

    /// Number of underlying entries: children or labels.
    pub const fn child_count(&self) -> usize {
        match self.kind {
            ItemKind::Submenu(children) => children.len(),
            ItemKind::StringList(labels) => labels.len(),
            _ => 0,
        }
    }

    /// Whether the list shows a filtered subset of this item's entries.
    pub const fn is_filtered(&self) -> bool {
        matches!(self.kind, ItemKind::Submenu(_) | ItemKind::StringList(_))
    }

    pub const fn is_string_list(&self) -> bool {
        matches!(self.kind, ItemKind::StringList(_))
    }

    pub const fn is_setting(&self) -> bool {
        matches!(self.kind, ItemKind::Setting(_) | ItemKind::SettingWithText(_))
    }

    pub const fn setting_id(&self) -> Option<SettingId> {
        match self.kind {
            ItemKind::Setting(id) | ItemKind::SettingWithText(id) => Some(id),
            _ => None,
        }
    }

    /// Static description text, if any.
    pub const fn text(&self) -> Option<&'a str> {
        match self.desc {
            Description::Static { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Explicit icon of the description, `NoIcon` when there is none.
    pub const fn icon(&self) -> Icon {
        match self.desc {
            Description::Static { icon, .. } | Description::Dynamic { icon, .. } => icon,
            Description::None => Icon::NoIcon,
        }
    }

    /// Child `index` of a submenu.
    pub fn child(&self, index: usize) -> Option<&'a MenuItem<'a>> {
        match self.kind {
            ItemKind::Submenu(children) => children.get(index).copied(),
            _ => None,
        }
    }
}
