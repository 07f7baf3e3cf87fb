//! Value module - In-memory storage model for nested ordered containers.
//!
//! A [`Value`] is either a scalar leaf or a [`Container`] of keyed entries.
//! Navigation views over values live in [`crate::node`].

mod codec;
mod key;
mod value;

pub use codec::*;
pub use key::*;
pub use value::*;
