//! Constructive route building.
//!
//! - [`build_route`] — Greedy nearest-eligible selection with skew, capacity
//!   and co-delivery handling, O(c·n)
//! - [`insert_dependents`] — Cheapest-detour splicing of pending partners

mod greedy;

pub use greedy::{build_route, insert_dependents};
