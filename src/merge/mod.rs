//! Merge module - Recursive merging of nested containers.
//!
//! Merging never overwrites silently: colliding scalars are gathered into a
//! sequence instead.

mod recursive;

#[cfg(test)]
mod merge_test;

pub use recursive::*;
