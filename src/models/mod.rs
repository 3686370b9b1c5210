//! Domain model types for package delivery routing.
//!
//! Provides identifiers, locations, packages with their typed constraints
//! and status, trucks, parsed notes, and routes as ordered stop sequences.

mod ids;
mod location;
mod note;
mod package;
mod route;
mod truck;

pub use ids::{LocationId, PackageId, TruckId};
pub use location::Location;
pub use note::Note;
pub use package::{Constraint, Deadline, Package, Status};
pub use route::{Route, Stop, StopKind};
pub use truck::{Truck, DEFAULT_CAPACITY, DEFAULT_SPEED_MPH};
