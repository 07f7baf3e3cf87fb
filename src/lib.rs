//! # Treewalk
//!
//! Path queries, cursors and in-place mutation over nested ordered containers.
//!
//! A document is wrapped once with [`walk`]; every further view is created on
//! demand while navigating. Paths are separator-delimited segments with a `*`
//! wildcard and positional pseudo-selectors (`parent()`, `nthChild(n)`,
//! `first()`, `last()`).
//!
//! ```
//! use treewalk::{from_json, walk, Value};
//!
//! let root = walk(from_json(r#"{"user": {"roles": ["admin", "editor"]}}"#).unwrap());
//! let editor = root.resolve("user/roles::nthChild(2)").unwrap();
//! assert_eq!(editor.value(), Value::from("editor"));
//! assert_eq!(editor.absolute_path(), "user/roles/1");
//! ```
//!
//! ## Modules
//!
//! - [`value`] - Storage model: keys, scalar values and ordered containers
//! - [`path`] - Path segments and pseudo-selector parsing
//! - [`node`] - Leaf and container views, resolution, cursor and mutation
//! - [`merge`] - Recursive merge of containers

pub mod merge;
pub mod node;
pub mod path;
pub mod value;

pub use merge::merge_values;
pub use node::{walk, Document, Node, NodeKind};
pub use path::{Segment, Selector, DEFAULT_SEPARATOR};
pub use value::{from_json, from_yaml, to_json, to_yaml, CodecError, Container, Key, Value};
