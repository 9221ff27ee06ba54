//! Hierarchical menu navigation.
//!
//! [`item`] describes menu trees, [`MenuEngine`] walks them. The remaining
//! modules are the engine's building blocks and are public so hosts can
//! render or test pieces on their own.

pub mod context;
mod engine;
pub mod item;
pub mod setting;
pub mod stack;
pub mod view;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use context::ContextChoice;
pub use engine::{EngineState, MenuEngine, MenuState};
pub use item::{
    Description, FunctionCall, Icon, ItemContext, ItemFlags, ItemKind, ItemType, MenuCallback,
    MenuFunction, MenuItem, NameBuf, NameProvider, NoCallback,
};
pub use stack::{NavStack, StackEntry};
pub use view::{menu_title, MenuView};
pub use visibility::VisibleIndexMap;
