//! Node module - Lazily materialized views over nested containers.
//!
//! A [`Document`] holds the backing data. Nodes are created on demand by
//! [`Node::get`], [`Node::resolve`] and the cursor, and read and write that
//! data in place.

mod cursor;
mod document;
mod mutate;
mod node;
mod resolve;


pub use document::*;
pub use node::{Node, NodeKind};
