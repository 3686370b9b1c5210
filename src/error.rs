//! Error type shared by the dispatch layer and the graph.

use crate::models::{LocationId, PackageId, TruckId};

/// Errors surfaced by routing operations.
///
/// Map misses inside the core are plain `Option`s; they become one of
/// these variants where an id crosses the public boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// No package with this id is registered.
    UnknownPackage(PackageId),
    /// No location with this id is in the graph or location table.
    UnknownLocation(LocationId),
    /// No truck with this id is registered.
    UnknownTruck(TruckId),
    /// A package note could not be parsed.
    InvalidNote(String),
    /// A dispatch plan could not be read.
    Config(String),
}

impl std::fmt::Display for RoutingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingError::UnknownPackage(id) => write!(f, "Unknown package: {}", id),
            RoutingError::UnknownLocation(id) => write!(f, "Unknown location: {}", id),
            RoutingError::UnknownTruck(id) => write!(f, "Unknown truck: {}", id),
            RoutingError::InvalidNote(msg) => write!(f, "Invalid note: {}", msg),
            RoutingError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for RoutingError {}

impl From<serde_json::Error> for RoutingError {
    fn from(e: serde_json::Error) -> Self {
        RoutingError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            RoutingError::UnknownPackage(PackageId::new(7)).to_string(),
            "Unknown package: 7"
        );
        assert_eq!(
            RoutingError::InvalidNote("X 1".into()).to_string(),
            "Invalid note: X 1"
        );
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(RoutingError::from(err), RoutingError::Config(_)));
    }
}
