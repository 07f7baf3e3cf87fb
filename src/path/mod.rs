//! Path module - The path mini-language.
//!
//! Paths are separator-delimited segments. A bare `*` segment is a wildcard;
//! any other segment is a key, optionally followed by a pseudo-selector
//! clause such as `roles::nthChild(2)`.

mod path;
mod segment;

pub use path::*;
pub use segment::*;
