//! In-place mutation of container nodes.
//!
//! Every mutation writes straight into the shared document and then reloads
//! the node that performed it. Other nodes aliasing the same slot see the new
//! data but keep their key snapshots until they reload themselves.

use super::node::Node;
use crate::merge::merge_containers;
use crate::path::{Path, DEFAULT_SEPARATOR};
use crate::value::{Container, Key, Value};
use tracing::{debug, trace};

impl Node {
    /// Runs `f` on this node's container slot and reloads afterwards.
    ///
    /// Returns None without touching storage for leaves and for nodes whose
    /// slot no longer holds a container.
    fn mutate<R>(&self, operation: &str, f: impl FnOnce(&mut Container) -> R) -> Option<R> {
        self.container_view()?;
        let result = self
            .document()
            .write(self.location(), |slot| slot.as_container_mut().map(f))
            .flatten()?;
        self.reload();
        debug!(
            operation,
            location = %self.absolute_path(),
            count = self.count(),
            "mutated container"
        );
        Some(result)
    }

    /// Writes `value` at the `/`-separated `path` below this node.
    pub fn set(&self, path: &str, value: impl Into<Value>) -> Option<&Self> {
        self.set_with(path, value, DEFAULT_SEPARATOR)
    }

    /// Writes `value` at `path` below this node, overwriting whatever the last
    /// segment held.
    ///
    /// Intermediate segments that are missing, or that hold a scalar, become
    /// empty containers; intermediate containers are kept. An empty path, or
    /// one with an empty segment, writes nothing and returns None.
    pub fn set_with(&self, path: &str, value: impl Into<Value>, separator: &str) -> Option<&Self> {
        let parsed = Path::parse(path, separator);
        if parsed.raw_segments().iter().any(|raw| raw.is_empty()) {
            trace!(path, "empty segment, nothing to set");
            return None;
        }
        let (last, init) = parsed.split_last()?;
        let value = value.into();

        self.mutate("set", |container| {
            let mut current = container;
            for raw in init {
                let slot = current.entry_mut(Key::parse(raw));
                if !slot.is_container() {
                    *slot = Value::Container(Container::new());
                }
                current = slot.as_container_mut()?;
            }
            current.insert(Key::parse(last), value);
            Some(())
        })
        .flatten()?;
        Some(self)
    }

    /// Adds `values` after the last entry, in order, under the next free
    /// integer keys.
    pub fn append<I, V>(&self, values: I) -> Option<&Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.mutate("append", |container| {
            for value in values {
                container.push(value.into());
            }
        })?;
        Some(self)
    }

    /// Inserts `values` before the first entry, in order, renumbering the
    /// integer keys.
    pub fn prepend<I, V>(&self, values: I) -> Option<&Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.mutate("prepend", |container| {
            container.prepend(values.into_iter().map(Into::into));
        })?;
        Some(self)
    }

    /// Removes the first entry and returns its value. Integer keys of the
    /// remaining entries are renumbered.
    pub fn shift(&self) -> Option<Value> {
        self.mutate("shift", |container| {
            let entry = container.remove_first()?;
            container.renumber();
            Some(entry.value)
        })
        .flatten()
    }

    /// Removes the last entry and returns its value.
    pub fn pop(&self) -> Option<Value> {
        self.mutate("pop", |container| {
            container.remove_last().map(|entry| entry.value)
        })
        .flatten()
    }

    /// Merges `other` into this container.
    ///
    /// `other` may be a container, a node, or a scalar; scalars merge as a
    /// one-element sequence. See [`crate::merge::merge_values`] for the rule.
    pub fn merge(&self, other: impl Into<Value>) -> Option<&Self> {
        let other = other.into().into_container();
        self.mutate("merge", |container| {
            let current = std::mem::take(container);
            *container = merge_containers(current, other);
        })?;
        Some(self)
    }
}
