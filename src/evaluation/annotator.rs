//! Per-stop time and distance annotation.

use chrono::NaiveTime;
use tracing::warn;

use crate::distance::PathTable;
use crate::models::{LocationId, Route, Truck};

/// Stamps every stop with cumulative distance and arrival time.
///
/// Walks the stops in order, adding the shortest distance from the previous
/// stop (zero for the departure marker). Arrival is
/// `start + cumulative distance / truck speed`. The route's total distance
/// becomes the last stop's cumulative distance.
///
/// A leg between unknown or disconnected locations counts as zero miles and
/// is reported. Arrivals that would run past midnight are clamped to the
/// last millisecond of the day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use package_routing::distance::DistanceGraph;
/// use package_routing::evaluation::annotate_route;
/// use package_routing::models::{LocationId, PackageId, Route, Truck, TruckId};
///
/// let mut graph = DistanceGraph::new();
/// graph.add_edge(LocationId::DEPOT, LocationId::new(2), 9.0);
///
/// let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
/// let truck = Truck::new(TruckId::new(1));
/// let mut route = Route::new(eight, truck.id());
/// route.push_package(PackageId::new(1), LocationId::new(2));
///
/// annotate_route(&mut route, graph.paths(), &truck);
/// assert_eq!(route.stops()[1].time, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
/// assert_eq!(route.total_distance(), 18.0);
/// ```
pub fn annotate_route(route: &mut Route, paths: &PathTable, truck: &Truck) {
    let start = route.start();
    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(start);
    let mut total = 0.0;
    let mut prev: Option<LocationId> = None;
    let mut clamped = false;

    for stop in route.stops_mut() {
        if let Some(from) = prev {
            match paths.distance(from, stop.location).filter(|d| d.is_finite()) {
                Some(leg) => total += leg,
                None => warn!(
                    "No path from location {} to {}; leg counted as zero",
                    from, stop.location
                ),
            }
        }
        stop.distance = total;
        let (arrival, wrapped) = start.overflowing_add_signed(truck.travel_time(total));
        stop.time = if wrapped == 0 {
            arrival
        } else {
            clamped = true;
            end_of_day
        };
        prev = Some(stop.location);
    }

    if clamped {
        warn!(
            "Route for truck {} leaving at {} runs past midnight; arrivals clamped to end of day",
            route.truck(),
            start.format("%H:%M")
        );
    }
    route.set_total_distance(total);
}
