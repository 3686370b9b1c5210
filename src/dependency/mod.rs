//! Co-delivery grouping.
//!
//! - [`DependencyResolver`] — union-find over pairwise "ship with" relations
//! - [`DependencyGroups`] — frozen transitive groups, applied to packages

mod resolver;

pub use resolver::{DependencyGroups, DependencyResolver};
