//! Dispatch layer: plans in, routes and point-in-time statuses out.
//!
//! - [`DispatchPlan`] — ordered route starts, loadable from JSON
//! - [`DeliverySimulation`] — owns the graph, manifest and fleet for one run

mod plan;
mod simulation;

pub use plan::{DispatchPlan, RoutePlan};
pub use simulation::DeliverySimulation;
