//! Bounded navigation stack of ancestor menus.

use crate::config::MAX_MENUS;

use super::item::MenuItem;

/// A parent menu and the underlying index that was selected in it.
#[derive(Clone, Copy)]
pub struct StackEntry<'a> {
    pub menu: &'a MenuItem<'a>,
    pub selected: usize,
}

/// Ancestors of the current menu, root-most first.
///
/// Pushing onto a full stack is a no-op: deep trees stay at the current
/// depth instead of overwriting anything.
pub struct NavStack<'a, const N: usize = MAX_MENUS> {
    entries: heapless::Vec<StackEntry<'a>, N>,
}

impl<'a, const N: usize> NavStack<'a, N> {
    pub const fn new() -> Self {
        Self {
            entries: heapless::Vec::new(),
        }
    }

    /// Remember `menu` with its selection. Returns `false` (and changes
    /// nothing) when the stack is full.
    pub fn push(&mut self, menu: &'a MenuItem<'a>, selected: usize) -> bool {
        self.entries.push(StackEntry { menu, selected }).is_ok()
    }

    pub fn pop(&mut self) -> Option<StackEntry<'a>> {
        self.entries.pop()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// The root-most entry.
    pub fn bottom(&self) -> Option<&StackEntry<'a>> {
        self.entries.first()
    }
}

impl<const N: usize> Default for NavStack<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
