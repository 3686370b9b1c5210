//! Container types backing the package table and working sets.

mod ordered_map;

pub use ordered_map::{Iter, OrderedMap};
