//! # package-routing
//!
//! Same-day package delivery routing for a small truck fleet leaving a
//! single hub. Packages carry delay, address correction, truck restriction
//! and co-delivery constraints; routes are built greedily and statuses can
//! be projected to any time of day.
//!
//! ## Modules
//!
//! - [`collections`] — Insertion-ordered Robin Hood hash map
//! - [`models`] — Domain model types (Package, Truck, Location, Route, Note)
//! - [`distance`] — Location graph with lazy all-pairs shortest paths
//! - [`dependency`] — Transitive co-delivery groups
//! - [`evaluation`] — Arrival time and distance annotation
//! - [`constructive`] — Greedy constrained route construction
//! - [`projection`] — Point-in-time package status and truck mileage
//! - [`dispatch`] — Dispatch plans and the simulation context

pub mod collections;
pub mod constructive;
pub mod dependency;
pub mod dispatch;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod projection;

pub use error::RoutingError;
