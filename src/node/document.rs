//! Shared backing storage for node views.

use super::node::Node;
use crate::value::{Key, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Document is the single backing structure that every node of one view
/// tree reads and writes.
///
/// Cloning a document clones the handle, not the data: all clones and all
/// nodes materialized from them alias the same storage.
#[derive(Clone, Default)]
pub struct Document {
    storage: Rc<RefCell<Value>>,
}

impl Document {
    /// Creates a document owning `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        Document {
            storage: Rc::new(RefCell::new(value.into())),
        }
    }

    /// Materializes a fresh root node over the whole document.
    ///
    /// Each call returns a new root instance; roots of one document alias
    /// the same storage but keep their own key snapshot and cursor.
    pub fn root(&self) -> Node {
        Node::root(self.clone())
    }

    /// Returns a copy of the stored value.
    pub fn value(&self) -> Value {
        self.storage.borrow().clone()
    }

    /// Runs `f` on the slot at `location`, if it exists.
    pub(crate) fn read<R>(&self, location: &[Key], f: impl FnOnce(&Value) -> R) -> Option<R> {
        let storage = self.storage.borrow();
        storage.lookup(location).map(f)
    }

    /// Runs `f` on the slot at `location` for writing, if it exists.
    pub(crate) fn write<R>(
        &self,
        location: &[Key],
        f: impl FnOnce(&mut Value) -> R,
    ) -> Option<R> {
        let mut storage = self.storage.borrow_mut();
        storage.lookup_mut(location).map(f)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Document").field(&self.storage.borrow()).finish()
    }
}

/// Wraps `value` in a new document and returns its root view.
///
/// The root is a container node if `value` is container-shaped and a leaf
/// node otherwise.
pub fn walk(value: impl Into<Value>) -> Node {
    Document::new(value).root()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::value::Container;

    #[test]
    fn test_walk_classifies_root() {
        assert_eq!(walk(Container::new()).kind(), NodeKind::Container);
        assert_eq!(walk(Value::Int(3)).kind(), NodeKind::Leaf);
    }

    #[test]
    fn test_roots_of_one_document_alias_storage() {
        let doc = Document::new(Container::new());
        let a = doc.root();
        let b = doc.root();
        assert!(!a.same_node(&b));

        a.append([Value::Int(1)]);
        assert_eq!(b.value(), Value::from(vec![Value::Int(1)]));
        assert_eq!(doc.value(), a.value());
    }

    #[test]
    fn test_read_missing_location() {
        let doc = Document::new(Container::new());
        assert_eq!(doc.read(&[Key::parse("nope")], Value::clone), None);
    }
}
