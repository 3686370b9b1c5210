//! Delivery location.

use serde::{Deserialize, Serialize};

use super::LocationId;

/// A delivery address keyed by its graph node.
///
/// Address fields are carried for display only; routing reads just the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    name: String,
    address: String,
    city: String,
    zip: String,
}

impl Location {
    /// Creates a location with a street address and no other fields.
    pub fn new(id: LocationId, address: impl Into<String>) -> Self {
        Self {
            id,
            name: String::new(),
            address: address.into(),
            city: String::new(),
            zip: String::new(),
        }
    }

    /// Sets the place name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Sets the postal code.
    pub fn with_zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = zip.into();
        self
    }

    /// Returns the location identifier.
    pub fn id(&self) -> LocationId {
        self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the street address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the city.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the postal code.
    pub fn zip(&self) -> &str {
        &self.zip
    }
}
