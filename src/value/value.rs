//! Core value types and operations.

use super::key::Key;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Value represents one storage slot: either a terminal scalar or a nested
/// container.
///
/// Whether a slot is a leaf or a container is decided when the value is
/// written, never inferred again on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Container(Container),
}

/// Entry is a single key-value pair of a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: Key,
    pub value: Value,
}

/// Container is an insertion-ordered mapping from keys to values.
///
/// Keys are unique. Lookups are linear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    entries: Vec<Entry>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Container(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Value::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Value::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the name of the stored type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Container(_) => "container",
        }
    }

    /// Follows `path` from this value, one key per container level.
    ///
    /// An empty path returns `self`. Descending through a scalar fails.
    pub fn lookup(&self, path: &[Key]) -> Option<&Value> {
        path.iter()
            .try_fold(self, |current, key| current.as_container()?.get(key))
    }

    /// Mutable counterpart of [`Value::lookup`].
    pub fn lookup_mut(&mut self, path: &[Key]) -> Option<&mut Value> {
        let mut current = self;
        for key in path {
            current = current.as_container_mut()?.get_mut(key)?;
        }
        Some(current)
    }

    /// Wraps a scalar into a one-element sequence; containers pass through.
    pub fn into_container(self) -> Container {
        match self {
            Value::Container(c) => c,
            scalar => Container::from_values([scalar]),
        }
    }
}

impl Container {
    pub fn new() -> Self {
        Container {
            entries: Vec::new(),
        }
    }

    /// Builds a sequence-shaped container keyed `0..n`.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut c = Container::new();
        for value in values {
            c.push(value);
        }
        c
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Key) -> Option<usize> {
        self.entries.iter().position(|e| &e.key == key)
    }

    pub fn has(&self, key: &Key) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.iter().find(|e| &e.key == key).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|e| &e.key == key)
            .map(|e| &mut e.value)
    }

    /// Writes `value` under `key`, overwriting in place if the key exists and
    /// appending otherwise. Returns the previous value.
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        match self.position(&key) {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos].value, value)),
            None => {
                self.entries.push(Entry { key, value });
                None
            }
        }
    }

    /// Returns the slot under `key`, inserting `Null` first if absent.
    pub fn entry_mut(&mut self, key: Key) -> &mut Value {
        let pos = match self.position(&key) {
            Some(pos) => pos,
            None => {
                self.entries.push(Entry {
                    key,
                    value: Value::Null,
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].value
    }

    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        let pos = self.position(key)?;
        Some(self.entries.remove(pos).value)
    }

    pub fn remove_first(&mut self) -> Option<Entry> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.remove(0))
    }

    pub fn remove_last(&mut self) -> Option<Entry> {
        self.entries.pop()
    }

    /// Returns the integer key the next pushed value receives: one past the
    /// largest integer key, or 0.
    ///
    /// When the largest key is `i64::MAX`, the smallest unused non-negative
    /// index is returned instead.
    pub fn next_index(&self) -> i64 {
        let max = self.entries.iter().filter_map(|e| e.key.as_index()).max();
        match max {
            None => 0,
            Some(max) => max.checked_add(1).unwrap_or_else(|| self.first_free_index()),
        }
    }

    fn first_free_index(&self) -> i64 {
        let mut used: Vec<i64> = self
            .entries
            .iter()
            .filter_map(|e| e.key.as_index())
            .filter(|i| *i >= 0)
            .collect();
        used.sort_unstable();
        used.dedup();
        // The first gap in the sorted indices; there are fewer keys than i64::MAX.
        used.iter()
            .zip(0..)
            .find(|(index, candidate)| **index != *candidate)
            .map_or(used.len() as i64, |(_, candidate)| candidate)
    }

    /// Appends `value` under [`Container::next_index`].
    pub fn push(&mut self, value: Value) -> Key {
        let key = Key::Index(self.next_index());
        self.entries.push(Entry {
            key: key.clone(),
            value,
        });
        key
    }

    /// Inserts `values` before every existing entry, keeping their order, and
    /// renumbers the integer keys.
    pub fn prepend(&mut self, values: impl IntoIterator<Item = Value>) {
        let front = values.into_iter().enumerate().map(|(i, value)| Entry {
            // Placeholder keys; renumbered below.
            key: Key::Index(-1 - i as i64),
            value,
        });
        self.entries.splice(0..0, front);
        self.renumber();
    }

    /// Reassigns integer keys as `0..n` in entry order. Name keys are kept.
    pub fn renumber(&mut self) {
        let mut next = 0;
        for entry in &mut self.entries {
            if entry.key.is_index() {
                entry.key = Key::Index(next);
                next += 1;
            }
        }
    }

    /// Returns true if the keys are exactly `0..n` in order.
    pub fn is_sequence(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, e)| e.key == Key::Index(i as i64))
    }

    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|e| &e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|e| (&e.key, &e.value))
    }

    pub fn first(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }
}

impl IntoIterator for Container {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(Key, Value)> for Container {
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        let mut c = Container::new();
        for (key, value) in iter {
            c.insert(key, value);
        }
        c
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Container> for Value {
    fn from(c: Container) -> Self {
        Value::Container(c)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Container(Container::from_values(values))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Container(Container::from_values(items.into_iter().map(Value::from)))
            }
            serde_json::Value::Object(obj) => Value::Container(
                obj.into_iter()
                    .map(|(k, v)| (Key::parse(&k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Container {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_sequence() {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for value in self.values() {
                seq.serialize_element(value)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self.iter() {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }
}

struct ContainerVisitor;

impl<'de> Visitor<'de> for ContainerVisitor {
    type Value = Container;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence or a map")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Container, A::Error> {
        let mut c = Container::new();
        while let Some(value) = seq.next_element::<Value>()? {
            c.push(value);
        }
        Ok(c)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Container, A::Error> {
        let mut c = Container::new();
        while let Some((key, value)) = map.next_entry::<Key, Value>()? {
            c.insert(key, value);
        }
        Ok(c)
    }
}

impl<'de> Deserialize<'de> for Container {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Container, D::Error> {
        deserializer.deserialize_any(ContainerVisitor)
    }
}
