//! Delivery truck.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::TruckId;

/// Default stops per route.
pub const DEFAULT_CAPACITY: usize = 16;

/// Default average speed in miles per hour.
pub const DEFAULT_SPEED_MPH: f64 = 18.0;

/// A delivery truck with a stop capacity, an average speed and an odometer.
///
/// # Examples
///
/// ```
/// use package_routing::models::{Truck, TruckId};
///
/// let t = Truck::new(TruckId::new(1));
/// assert_eq!(t.capacity(), 16);
/// assert_eq!(t.travel_time(9.0).num_minutes(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    id: TruckId,
    capacity: usize,
    speed_mph: f64,
    mileage: f64,
}

impl Truck {
    /// Creates a truck with the default capacity and speed.
    pub fn new(id: TruckId) -> Self {
        Self {
            id,
            capacity: DEFAULT_CAPACITY,
            speed_mph: DEFAULT_SPEED_MPH,
            mileage: 0.0,
        }
    }

    /// Sets the maximum number of package stops per route.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the average speed.
    pub fn with_speed(mut self, mph: f64) -> Self {
        self.speed_mph = mph;
        self
    }

    /// Returns the truck identifier.
    pub fn id(&self) -> TruckId {
        self.id
    }

    /// Returns the maximum number of packages per route.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the average speed in miles per hour.
    pub fn speed_mph(&self) -> f64 {
        self.speed_mph
    }

    /// Miles driven as of the last status projection.
    pub fn mileage(&self) -> f64 {
        self.mileage
    }

    /// Sets the mileage back to zero before a projection.
    pub fn reset_mileage(&mut self) {
        self.mileage = 0.0;
    }

    /// Adds `miles` to the mileage.
    pub fn add_mileage(&mut self, miles: f64) {
        self.mileage += miles;
    }

    /// Driving time for `miles` at average speed, to the millisecond.
    pub fn travel_time(&self, miles: f64) -> TimeDelta {
        let millis = (miles / self.speed_mph * 3_600_000.0).round();
        TimeDelta::milliseconds(millis as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truck_defaults() {
        let t = Truck::new(TruckId::new(1));
        assert_eq!(t.id(), TruckId::new(1));
        assert_eq!(t.capacity(), 16);
        assert_eq!(t.speed_mph(), 18.0);
        assert_eq!(t.mileage(), 0.0);
    }

    #[test]
    fn test_truck_builder() {
        let t = Truck::new(TruckId::new(2)).with_capacity(4).with_speed(30.0);
        assert_eq!(t.capacity(), 4);
        assert_eq!(t.speed_mph(), 30.0);
    }

    #[test]
    fn test_mileage() {
        let mut t = Truck::new(TruckId::new(1));
        t.add_mileage(3.5);
        t.add_mileage(1.5);
        assert!((t.mileage() - 5.0).abs() < 1e-10);
        t.reset_mileage();
        assert_eq!(t.mileage(), 0.0);
    }

    #[test]
    fn test_travel_time() {
        let t = Truck::new(TruckId::new(1));
        assert_eq!(t.travel_time(18.0), TimeDelta::hours(1));
        assert_eq!(t.travel_time(0.0), TimeDelta::zero());
        assert_eq!(t.travel_time(0.1).num_seconds(), 20);
    }
}
