//! Route and stop types.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{LocationId, PackageId, TruckId};

/// What a stop visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopKind {
    /// Leaving from or returning to the hub.
    Depot,
    Package(PackageId),
}

/// A single scheduled visit within a route.
///
/// `time` and `distance` are cumulative from the route start and are only
/// meaningful once the route has been annotated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub kind: StopKind,
    pub location: LocationId,
    /// Arrival time.
    pub time: NaiveTime,
    /// Miles driven from the hub up to this stop.
    pub distance: f64,
}

impl Stop {
    fn depot(start: NaiveTime) -> Self {
        Self {
            kind: StopKind::Depot,
            location: LocationId::DEPOT,
            time: start,
            distance: 0.0,
        }
    }

    fn package(id: PackageId, location: LocationId, start: NaiveTime) -> Self {
        Self {
            kind: StopKind::Package(id),
            location,
            time: start,
            distance: 0.0,
        }
    }

    /// The package delivered here, if this is not a depot marker.
    pub fn package_id(&self) -> Option<PackageId> {
        match self.kind {
            StopKind::Package(id) => Some(id),
            StopKind::Depot => None,
        }
    }
}

/// An ordered run of stops for one truck leaving the hub at `start`.
///
/// A fresh route holds two depot markers (departure and return); package
/// stops always sit between them.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use package_routing::models::{LocationId, PackageId, Route, TruckId};
///
/// let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
/// let mut route = Route::new(eight, TruckId::new(1));
/// assert_eq!(route.stops().len(), 2);
///
/// route.push_package(PackageId::new(7), LocationId::new(4));
/// assert_eq!(route.len(), 1);
/// assert!(route.contains(PackageId::new(7)));
/// assert_eq!(route.last_location(), LocationId::new(4));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    start: NaiveTime,
    truck: TruckId,
    stops: Vec<Stop>,
    contains: BTreeSet<PackageId>,
    total_distance: f64,
}

impl Route {
    /// Creates an empty route with departure and return depot markers.
    pub fn new(start: NaiveTime, truck: TruckId) -> Self {
        Self {
            start,
            truck,
            stops: vec![Stop::depot(start), Stop::depot(start)],
            contains: BTreeSet::new(),
            total_distance: 0.0,
        }
    }

    /// Returns the departure time from the hub.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Returns the truck running the route.
    pub fn truck(&self) -> TruckId {
        self.truck
    }

    /// All stops including both depot markers.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Mutable stops for annotation.
    pub(crate) fn stops_mut(&mut self) -> &mut [Stop] {
        &mut self.stops
    }

    /// Number of package stops.
    pub fn len(&self) -> usize {
        self.contains.len()
    }

    /// Returns `true` if no package has been placed.
    pub fn is_empty(&self) -> bool {
        self.contains.is_empty()
    }

    /// Returns `true` if package `id` is on the route.
    pub fn contains(&self, id: PackageId) -> bool {
        self.contains.contains(&id)
    }

    /// Package ids in stop order.
    pub fn package_ids(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.stops.iter().filter_map(Stop::package_id)
    }

    /// Location of the last stop before the return marker.
    pub fn last_location(&self) -> LocationId {
        self.stops
            .len()
            .checked_sub(2)
            .and_then(|i| self.stops.get(i))
            .map_or(LocationId::DEPOT, |s| s.location)
    }

    /// Appends a package stop just before the return marker.
    pub fn push_package(&mut self, id: PackageId, location: LocationId) {
        let at = self.stops.len().saturating_sub(1);
        self.insert_package(at, id, location);
    }

    /// Inserts a package stop at `index` in the stop sequence.
    ///
    /// `index` is clamped to lie after the departure marker and no later
    /// than the return marker.
    pub fn insert_package(&mut self, index: usize, id: PackageId, location: LocationId) {
        let index = index.clamp(1, self.stops.len().saturating_sub(1).max(1));
        self.stops
            .insert(index, Stop::package(id, location, self.start));
        self.contains.insert(id);
    }

    /// Total miles including the return to the hub (set by annotation).
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Records the distance of the finished route.
    pub(crate) fn set_total_distance(&mut self, d: f64) {
        self.total_distance = d;
    }

    /// Arrival time back at the hub (set by annotation).
    pub fn end_time(&self) -> NaiveTime {
        self.stops.last().map_or(self.start, |s| s.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eight() -> NaiveTime {
        NaiveTime::from_hms_opt(8, 0, 0).expect("valid time")
    }

    #[test]
    fn test_route_empty() {
        let r = Route::new(eight(), TruckId::new(1));
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.stops().len(), 2);
        assert!(r.stops().iter().all(|s| s.kind == StopKind::Depot));
        assert_eq!(r.last_location(), LocationId::DEPOT);
        assert_eq!(r.total_distance(), 0.0);
        assert_eq!(r.end_time(), eight());
    }

    #[test]
    fn test_push_keeps_return_marker_last() {
        let mut r = Route::new(eight(), TruckId::new(1));
        r.push_package(PackageId::new(5), LocationId::new(3));
        r.push_package(PackageId::new(3), LocationId::new(9));
        assert_eq!(r.len(), 2);
        assert_eq!(
            r.package_ids().collect::<Vec<_>>(),
            vec![PackageId::new(5), PackageId::new(3)]
        );
        assert_eq!(r.stops().last().map(|s| s.kind), Some(StopKind::Depot));
        assert_eq!(r.last_location(), LocationId::new(9));
    }

    #[test]
    fn test_insert_clamped() {
        let mut r = Route::new(eight(), TruckId::new(1));
        r.push_package(PackageId::new(1), LocationId::new(2));
        r.insert_package(0, PackageId::new(2), LocationId::new(3));
        r.insert_package(99, PackageId::new(3), LocationId::new(4));
        assert_eq!(r.stops()[0].kind, StopKind::Depot);
        assert_eq!(r.stops()[1].package_id(), Some(PackageId::new(2)));
        assert_eq!(r.stops()[3].package_id(), Some(PackageId::new(3)));
        assert_eq!(r.stops()[4].kind, StopKind::Depot);
    }
}
