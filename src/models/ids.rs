//! Identifier newtypes.

use serde::{Deserialize, Serialize};

/// Package identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(u32);

impl PackageId {
    /// Wraps a raw id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id value.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Location identifier; a node of the distance graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(u32);

impl LocationId {
    /// The hub every route starts from and returns to.
    pub const DEPOT: LocationId = LocationId(1);

    /// Wraps a raw id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id value.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Truck identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TruckId(u32);

impl TruckId {
    /// Wraps a raw id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for TruckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PackageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for LocationId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for TruckId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depot_is_location_one() {
        assert_eq!(LocationId::DEPOT, LocationId::new(1));
        assert_eq!(LocationId::DEPOT.to_string(), "1");
    }

    #[test]
    fn test_transparent_serde() {
        let id: PackageId = serde_json::from_str("42").expect("valid");
        assert_eq!(id, PackageId::new(42));
        assert_eq!(serde_json::to_string(&TruckId::new(2)).expect("ser"), "2");
    }
}
