//! Leaf and container views over storage slots.

use super::document::Document;
use crate::path::{Segment, DEFAULT_SEPARATOR};
use crate::value::{Container, Key, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

/// NodeKind tells whether a node views a terminal value or a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Container,
}

/// Node is a view over one storage slot of a [`Document`].
///
/// Nodes are materialized on demand and never own the data they view: every
/// read and write goes through the shared document. Cloning a node clones
/// the handle, so clones share identity, key snapshot and cursor.
///
/// A container node caches the keys of its slot as of its last reload. A
/// mutation performed through another node aliasing the same slot is visible
/// in the data immediately, but this node's snapshot and cursor only change
/// when it reloads.
///
/// A node holds its parent strongly and a container holds the children it
/// handed out weakly, so ancestors are kept alive through their descendants.
/// The parent link is used for navigation only; storage is owned by the
/// document.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeInner>,
}

struct NodeInner {
    document: Document,
    /// Keys leading from the document root to this slot.
    location: Vec<Key>,
    key: Option<Key>,
    parent: Option<Node>,
    view: View,
}

enum View {
    Leaf,
    Container(ContainerView),
}

pub(crate) struct ContainerView {
    pub(crate) state: RefCell<Snapshot>,
    /// Children handed out so far. Weak so that the tree is only kept alive
    /// from the leaves up.
    children: RefCell<Vec<(Key, Weak<NodeInner>)>>,
}

/// Snapshot is the cached key order and cursor of a container node.
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    pub(crate) keys: Vec<Key>,
    pub(crate) last_index: Option<usize>,
    pub(crate) cursor: Option<usize>,
}

impl Snapshot {
    fn new(keys: Vec<Key>) -> Self {
        let last_index = keys.len().checked_sub(1);
        Snapshot {
            keys,
            last_index,
            cursor: None,
        }
    }
}

impl ContainerView {
    fn new() -> Self {
        ContainerView {
            state: RefCell::new(Snapshot::default()),
            children: RefCell::new(Vec::new()),
        }
    }

    fn cached(&self, key: &Key) -> Option<Node> {
        self.children
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, weak)| weak.upgrade())
            .map(|inner| Node { inner })
    }

    fn remember(&self, key: &Key, node: &Node) {
        let mut children = self.children.borrow_mut();
        children.retain(|(k, weak)| k != key && weak.strong_count() > 0);
        children.push((key.clone(), Rc::downgrade(&node.inner)));
    }
}

impl Node {
    pub(crate) fn root(document: Document) -> Node {
        let is_container = document
            .read(&[], Value::is_container)
            .unwrap_or(false);
        Node::materialize(document, Vec::new(), None, None, is_container)
    }

    fn materialize(
        document: Document,
        location: Vec<Key>,
        key: Option<Key>,
        parent: Option<Node>,
        is_container: bool,
    ) -> Node {
        let view = if is_container {
            View::Container(ContainerView::new())
        } else {
            View::Leaf
        };
        let node = Node {
            inner: Rc::new(NodeInner {
                document,
                location,
                key,
                parent,
                view,
            }),
        };
        node.reload();
        node
    }

    pub(crate) fn container_view(&self) -> Option<&ContainerView> {
        match &self.inner.view {
            View::Container(view) => Some(view),
            View::Leaf => None,
        }
    }

    pub(crate) fn document(&self) -> &Document {
        &self.inner.document
    }

    pub(crate) fn location(&self) -> &[Key] {
        &self.inner.location
    }

    pub fn kind(&self) -> NodeKind {
        match self.inner.view {
            View::Leaf => NodeKind::Leaf,
            View::Container(_) => NodeKind::Container,
        }
    }

    /// Returns true for container nodes: the only nodes that support
    /// selectors, the cursor and mutation.
    pub fn is_container(&self) -> bool {
        self.kind() == NodeKind::Container
    }

    /// Returns the key under which the parent holds this node; None for a root.
    pub fn key(&self) -> Option<&Key> {
        self.inner.key.as_ref()
    }

    pub fn parent(&self) -> Option<Node> {
        self.inner.parent.clone()
    }

    /// Returns true if both handles are the same node instance.
    pub fn same_node(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a copy of the value currently stored in this node's slot, or
    /// `Null` if the slot no longer exists.
    pub fn value(&self) -> Value {
        self.inner
            .document
            .read(&self.inner.location, Value::clone)
            .unwrap_or_default()
    }

    /// Rebuilds a plain value from the view tree below this node.
    ///
    /// Unlike [`Node::value`], containers are walked through their key
    /// snapshots, so a stale node yields the entries it currently exposes.
    pub fn primitive_value(&self) -> Value {
        if !self.is_container() {
            return self.value();
        }
        let entries = self
            .items()
            .into_iter()
            .map(|(key, child)| (key, child.primitive_value()));
        Value::Container(entries.collect())
    }

    /// Returns the type name of the stored value.
    pub fn type_name(&self) -> &'static str {
        self.inner
            .document
            .read(&self.inner.location, Value::type_name)
            .unwrap_or("null")
    }

    /// Returns the key snapshot taken at the last reload. Empty for leaves.
    pub fn keys(&self) -> Vec<Key> {
        self.container_view()
            .map(|view| view.state.borrow().keys.clone())
            .unwrap_or_default()
    }

    /// Returns the live number of entries in the slot. Zero for leaves.
    pub fn count(&self) -> usize {
        if !self.is_container() {
            return 0;
        }
        self.inner
            .document
            .read(&self.inner.location, |v| v.as_container().map_or(0, Container::len))
            .unwrap_or(0)
    }

    /// Returns true if the key snapshot contains `key`.
    pub fn has(&self, key: &Key) -> bool {
        self.container_view()
            .is_some_and(|view| view.state.borrow().keys.contains(key))
    }

    /// Returns every child in snapshot order.
    pub fn items(&self) -> Vec<(Key, Node)> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.child(&key).map(|node| (key, node)))
            .collect()
    }

    /// Resolves one path segment, which may carry a selector clause.
    ///
    /// With a selector, the plain key is looked up first and the selector
    /// applies to the resulting container; a missing key or a leaf yields
    /// None.
    pub fn get(&self, segment: &str) -> Option<Node> {
        let segment = Segment::parse(segment);
        let item = self.child(&segment.key)?;
        match segment.selector {
            None => Some(item),
            Some(selector) if item.is_container() => {
                trace!(
                    key = %segment.raw_key,
                    %selector,
                    argument = ?segment.argument,
                    "applying selector"
                );
                item.select(selector)
            }
            Some(selector) => {
                trace!(key = %segment.raw_key, %selector, "selector applied to a leaf");
                None
            }
        }
    }

    /// Looks up the child under `key` without selector parsing.
    ///
    /// A child that is still alive and of the right kind is returned as the
    /// same instance, reloaded first if its key snapshot went stale;
    /// otherwise a new node is materialized.
    pub fn child(&self, key: &Key) -> Option<Node> {
        let view = self.container_view()?;
        if !view.state.borrow().keys.contains(key) {
            return None;
        }

        let mut location = self.inner.location.clone();
        location.push(key.clone());
        let is_container = self.inner.document.read(&location, Value::is_container)?;

        if let Some(existing) = view.cached(key) {
            if existing.is_container() == is_container {
                existing.revalidate();
                return Some(existing);
            }
        }

        trace!(%key, is_container, "materializing child");
        let node = Node::materialize(
            self.inner.document.clone(),
            location,
            Some(key.clone()),
            Some(self.clone()),
            is_container,
        );
        view.remember(key, &node);
        Some(node)
    }

    /// Reloads if the key snapshot no longer matches storage.
    fn revalidate(&self) {
        let Some(view) = self.container_view() else {
            return;
        };
        let live = self
            .inner
            .document
            .read(&self.inner.location, |v| v.as_container().map(Container::keys))
            .flatten()
            .unwrap_or_default();
        if view.state.borrow().keys != live {
            self.reload();
        }
    }

    /// Recomputes the key snapshot from storage and resets the cursor.
    pub fn reload(&self) {
        if let Some(view) = self.container_view() {
            let keys = self
                .inner
                .document
                .read(&self.inner.location, |v| v.as_container().map(Container::keys))
                .flatten()
                .unwrap_or_default();
            *view.state.borrow_mut() = Snapshot::new(keys);
        }
    }

    /// Returns the path from the root to this node, joined with `/`.
    pub fn absolute_path(&self) -> String {
        self.absolute_path_with(DEFAULT_SEPARATOR)
    }

    /// Returns the path from the root to this node, joined with `separator`.
    pub fn absolute_path_with(&self, separator: &str) -> String {
        let mut keys = Vec::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if let Some(key) = node.key() {
                keys.push(key.to_string());
            }
            current = node.parent();
        }
        keys.reverse();
        keys.join(separator)
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        node.value()
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        node.value()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind())
            .field("key", &self.inner.key)
            .field("location", &self.inner.location)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::walk;
    use crate::value::from_json;

    fn sample() -> Node {
        walk(from_json(r#"{"user": {"name": "Ann", "roles": ["admin", "editor"]}}"#).unwrap())
    }

    #[test]
    fn test_root_value_equals_input() {
        let input = from_json(r#"{"a": [1, {"b": null}], "c": "x"}"#).unwrap();
        let root = walk(input.clone());
        assert_eq!(root.value(), input);
        assert_eq!(root.primitive_value(), input);
        assert_eq!(root.key(), None);
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_get_missing_key() {
        assert!(sample().get("nobody").is_none());
    }

    #[test]
    fn test_get_sets_key_and_parent() {
        let root = sample();
        let user = root.get("user").unwrap();
        assert_eq!(user.key(), Some(&Key::parse("user")));
        assert!(user.parent().unwrap().same_node(&root));
        assert!(user.is_container());

        let name = user.get("name").unwrap();
        assert_eq!(name.kind(), NodeKind::Leaf);
        assert_eq!(name.value(), Value::from("Ann"));
        assert_eq!(name.type_name(), "string");
    }

    #[test]
    fn test_repeated_get_preserves_identity() {
        let root = sample();
        let first = root.get("user").unwrap();
        let second = root.get("user").unwrap();
        assert!(first.same_node(&second));
    }

    #[test]
    fn test_leaf_exposes_no_container_operations() {
        let name = sample().get("user").unwrap().get("name").unwrap();
        assert!(name.keys().is_empty());
        assert_eq!(name.count(), 0);
        assert!(name.get("0").is_none());
        assert!(name.items().is_empty());
    }

    #[test]
    fn test_selector_on_get() {
        let user = sample().get("user").unwrap();
        assert_eq!(user.get("roles::first()").unwrap().value(), Value::from("admin"));
        assert_eq!(user.get("roles::LAST()").unwrap().value(), Value::from("editor"));
        assert_eq!(
            user.get("roles::nthChild(2)").unwrap().value(),
            Value::from("editor")
        );
        assert!(user.get("roles::parent()").unwrap().same_node(&user));
        assert!(user.get("name::first()").is_none());
    }

    #[test]
    fn test_absolute_path() {
        let root = sample();
        let admin = root.get("user").unwrap().get("roles").unwrap().get("0").unwrap();
        assert_eq!(admin.absolute_path(), "user/roles/0");
        assert_eq!(admin.absolute_path_with("."), "user.roles.0");
        assert_eq!(root.absolute_path(), "");
    }

    #[test]
    fn test_descendant_keeps_ancestors_alive() {
        let admin = sample().resolve("user/roles/0").unwrap();
        let roles = admin.parent().unwrap();
        assert_eq!(roles.absolute_path(), "user/roles");
        assert!(roles.get("0").unwrap().same_node(&admin));
        assert_eq!(admin.absolute_path(), "user/roles/0");
    }

    #[test]
    fn test_items_in_snapshot_order() {
        let user = sample().get("user").unwrap();
        let keys: Vec<_> = user.items().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Key::parse("name"), Key::parse("roles")]);
        assert_eq!(user.count(), 2);
        assert!(user.has(&Key::parse("roles")));
    }
}
