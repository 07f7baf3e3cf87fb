//! Cursor iteration and positional selectors.

use super::node::Node;
use crate::path::Selector;
use crate::value::{Key, Value};

impl Node {
    /// Applies a positional selector to this container. Leaves select nothing.
    pub fn select(&self, selector: Selector) -> Option<Node> {
        if !self.is_container() {
            return None;
        }
        match selector {
            Selector::Parent => self.parent(),
            Selector::NthChild(n) => self.nth_child(n),
            Selector::First => self.first(),
            Selector::Last => self.last(),
        }
    }

    /// Moves the cursor forward and returns the child there.
    ///
    /// From the unset position the cursor moves to the first child. At the
    /// last child it stays put and returns None.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<Node> {
        let key = {
            let mut state = self.container_view()?.state.borrow_mut();
            let last = state.last_index?;
            let index = match state.cursor {
                None => 0,
                Some(i) if i >= last => return None,
                Some(i) => i + 1,
            };
            state.cursor = Some(index);
            state.keys[index].clone()
        };
        self.child(&key)
    }

    /// Moves the cursor back and returns the child there.
    ///
    /// From the unset position or the first child the cursor stays put and
    /// returns None.
    pub fn prev(&self) -> Option<Node> {
        let key = {
            let mut state = self.container_view()?.state.borrow_mut();
            let index = match state.cursor {
                None | Some(0) => return None,
                Some(i) => i - 1,
            };
            state.cursor = Some(index);
            state.keys[index].clone()
        };
        self.child(&key)
    }

    /// Resets the cursor to before the first child.
    pub fn rewind(&self) -> &Self {
        if let Some(view) = self.container_view() {
            view.state.borrow_mut().cursor = None;
        }
        self
    }

    /// Returns the cursor position, None while unset.
    pub fn cursor(&self) -> Option<usize> {
        self.container_view()?.state.borrow().cursor
    }

    /// Returns the first child without moving the cursor.
    pub fn first(&self) -> Option<Node> {
        let key = self.key_at(0)?;
        self.child(&key)
    }

    /// Returns the last child without moving the cursor.
    pub fn last(&self) -> Option<Node> {
        let last = self.container_view()?.state.borrow().last_index?;
        let key = self.key_at(last)?;
        self.child(&key)
    }

    /// Returns the child at 1-based position `n`.
    pub fn nth_child(&self, n: i64) -> Option<Node> {
        let index = usize::try_from(n.checked_sub(1)?).ok()?;
        let key = self.key_at(index)?;
        self.child(&key)
    }

    /// Returns the child at the 1-based position computed by `position` from
    /// `args`.
    pub fn nth_child_with<F>(&self, position: F, args: &[Value]) -> Option<Node>
    where
        F: FnOnce(&[Value]) -> i64,
    {
        self.nth_child(position(args))
    }

    fn key_at(&self, index: usize) -> Option<Key> {
        self.container_view()?.state.borrow().keys.get(index).cloned()
    }
}
