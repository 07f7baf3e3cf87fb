//! Recursive merge of values.

use crate::value::{Container, Entry, Key, Value};

/// Merges `right` into `left` and returns the result. Neither input is
/// modified.
///
/// Scalars on either side are treated as one-element sequences. Integer keys
/// never collide: entries from both sides are renumbered in order, left
/// first. Name keys present on both sides merge recursively; when either
/// side of such a collision is a scalar, the result is a sequence of all the
/// colliding values, left before right.
pub fn merge_values(left: &Value, right: &Value) -> Value {
    Value::Container(merge_containers(
        left.clone().into_container(),
        right.clone().into_container(),
    ))
}

/// Merges two containers under the rule of [`merge_values`].
pub fn merge_containers(left: Container, right: Container) -> Container {
    let mut merged = Container::new();
    for Entry { key, value } in left.into_iter().chain(right) {
        merge_entry(&mut merged, key, value);
    }
    merged
}

fn merge_entry(merged: &mut Container, key: Key, value: Value) {
    match key {
        Key::Index(_) => {
            merged.push(value);
        }
        Key::Name(_) => match merged.get_mut(&key) {
            Some(existing) => {
                let current = std::mem::take(existing);
                *existing = Value::Container(merge_containers(
                    current.into_container(),
                    value.into_container(),
                ));
            }
            None => {
                merged.insert(key, value);
            }
        },
    }
}
