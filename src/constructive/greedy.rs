//! Greedy constrained route construction.
//!
//! # Algorithm
//!
//! Starting at the hub, repeatedly pick the nearest eligible package from the
//! shared working set. A package is eligible when it is at the hub by the
//! route's start time, may ride this truck, sits at a reachable location,
//! and its unplaced co-delivery partners are equally ready for this truck
//! and still fit under its capacity. Deadline-bound packages have `skew` subtracted from their
//! distance; on an exact tie the deadline-bound package wins, then the
//! earlier one in the working set.
//!
//! Partners of a placed package become pending dependents. Whatever the
//! greedy loop leaves pending is spliced in afterwards at the cheapest
//! detour position, and the finished route is annotated with arrival times
//! and distances.
//!
//! # Complexity
//!
//! O(c·n) for the greedy loop, where c = truck capacity and n = working set
//! size, plus O(c²) for dependent insertion.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use tracing::{debug, info, warn};

use crate::collections::OrderedMap;
use crate::distance::PathTable;
use crate::evaluation::annotate_route;
use crate::models::{Package, PackageId, Route, Truck};

/// Winner of one greedy selection round.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: PackageId,
    adjusted: f64,
    deadline_bound: bool,
}

impl Candidate {
    fn beats(&self, other: &Candidate) -> bool {
        self.adjusted < other.adjusted
            || (self.adjusted == other.adjusted && self.deadline_bound && !other.deadline_bound)
    }
}

/// Builds one route for `truck` leaving the hub at `start`.
///
/// Every package placed is removed from `working`, so successive calls on
/// the same working set never assign a package twice. The returned route is
/// complete and annotated; it may hold fewer than `truck.capacity()`
/// packages when every remaining candidate is rejected.
///
/// # Arguments
///
/// * `working` — Packages still waiting for a route
/// * `paths` — Shortest path table over every package location
/// * `start` — Departure time from the hub
/// * `truck` — Truck running the route
/// * `skew` — Miles subtracted from deadline-bound candidates
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use package_routing::collections::OrderedMap;
/// use package_routing::constructive::build_route;
/// use package_routing::distance::DistanceGraph;
/// use package_routing::models::{Deadline, LocationId, Package, PackageId, Truck, TruckId};
///
/// let (hub, a, b) = (LocationId::DEPOT, LocationId::new(2), LocationId::new(3));
/// let mut graph = DistanceGraph::new();
/// graph.add_edge(hub, a, 1.0);
/// graph.add_edge(hub, b, 2.0);
/// graph.add_edge(a, b, 1.0);
///
/// let mut working = OrderedMap::new();
/// for (id, loc) in [(1, b), (2, a)] {
///     let id = PackageId::new(id);
///     working.insert(id, Package::new(id, loc, Deadline::EndOfDay, 1.0));
/// }
///
/// let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
/// let truck = Truck::new(TruckId::new(1));
/// let route = build_route(&mut working, graph.paths(), eight, &truck, 0.0);
///
/// assert_eq!(
///     route.package_ids().collect::<Vec<_>>(),
///     vec![PackageId::new(2), PackageId::new(1)]
/// );
/// assert!(working.is_empty());
/// assert_eq!(route.total_distance(), 4.0);
/// ```
pub fn build_route(
    working: &mut OrderedMap<PackageId, Package>,
    paths: &PathTable,
    start: NaiveTime,
    truck: &Truck,
    skew: f64,
) -> Route {
    let mut route = Route::new(start, truck.id());
    let mut pending: BTreeSet<PackageId> = BTreeSet::new();

    while route.len() + pending.len() < truck.capacity() && !working.is_empty() {
        let from = route.last_location();
        let mut best: Option<Candidate> = None;

        for (&id, package) in working.iter() {
            if !package.is_available_at(start) || !package.can_ride(truck.id()) {
                continue;
            }

            let joining = unplaced_partners(package, &route, &pending, working);
            let still_pending = pending.len() - usize::from(pending.contains(&id));
            if route.len() + 1 + still_pending + joining.len() > truck.capacity() {
                continue;
            }
            let partners_ready = joining.iter().all(|m| {
                working
                    .get(m)
                    .is_some_and(|p| p.is_available_at(start) && p.can_ride(truck.id()))
            });
            if !partners_ready {
                continue;
            }

            let Some(distance) = paths
                .distance(from, package.location())
                .filter(|d| d.is_finite())
            else {
                continue;
            };

            let deadline_bound = package.deadline().is_bound();
            let candidate = Candidate {
                id,
                adjusted: if deadline_bound { distance - skew } else { distance },
                deadline_bound,
            };
            if best.as_ref().is_none_or(|b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }

        let Some(winner) = best else {
            warn!(
                "Truck {} at {}: all {} remaining packages rejected, closing route with {} stops",
                truck.id(),
                start.format("%H:%M"),
                working.len(),
                route.len() + pending.len()
            );
            break;
        };
        let Some(package) = working.remove(&winner.id) else {
            break;
        };

        pending.remove(&winner.id);
        let joining = unplaced_partners(&package, &route, &pending, working);
        if let Some(group) = package.must_ship_with() {
            for member in group {
                if !route.contains(*member) && !working.contains_key(member) {
                    warn!(
                        "Package {} must ship with {}, which is not in the working set",
                        winner.id, member
                    );
                }
            }
        }
        pending.extend(joining);

        debug!(
            "Truck {}: placed package {} (adjusted distance {:.1})",
            truck.id(),
            winner.id,
            winner.adjusted
        );
        route.push_package(winner.id, package.location());
    }

    insert_dependents(&mut route, pending, working, paths);
    annotate_route(&mut route, paths, truck);

    info!(
        "Built route for truck {} at {}: {} packages, {:.1} miles",
        truck.id(),
        start.format("%H:%M"),
        route.len(),
        route.total_distance()
    );
    route
}

/// Splices each dependent in at its cheapest detour position.
///
/// For every pending package, finds the pair of consecutive stops
/// `(i - 1, i)` minimizing `d(i-1, p) + d(p, i) - d(i-1, i)` and inserts it
/// between them. Dependents already on the route are skipped. Dependents
/// missing from `working`, not yet at the hub when the route leaves, or
/// restricted to another truck are reported and skipped.
pub fn insert_dependents(
    route: &mut Route,
    dependents: impl IntoIterator<Item = PackageId>,
    working: &mut OrderedMap<PackageId, Package>,
    paths: &PathTable,
) {
    for id in dependents {
        if route.contains(id) {
            continue;
        }
        let Some(waiting) = working.get(&id) else {
            warn!("Dependent package {} is no longer in the working set", id);
            continue;
        };
        if !waiting.is_available_at(route.start()) || !waiting.can_ride(route.truck()) {
            warn!(
                "Dependent package {} cannot ride truck {} at {}; left in the working set",
                id,
                route.truck(),
                route.start().format("%H:%M")
            );
            continue;
        }
        let Some(package) = working.remove(&id) else {
            continue;
        };

        let location = package.location();
        let stops = route.stops();
        let dist = |a, b| paths.distance(a, b).unwrap_or(f64::INFINITY);

        let mut best: Option<(usize, f64)> = None;
        for i in 1..stops.len() {
            let prev = stops[i - 1].location;
            let next = stops[i].location;
            let cost = dist(prev, location) + dist(location, next) - dist(prev, next);
            if best.as_ref().is_none_or(|b| cost < b.1) {
                best = Some((i, cost));
            }
        }
        let at = best.map_or(stops.len().saturating_sub(1), |(i, _)| i);

        debug!("Inserted dependent package {} at stop {}", id, at);
        route.insert_package(at, id, location);
    }
}

/// Co-delivery partners of `package` that are neither placed nor pending
/// but still waiting in the working set.
fn unplaced_partners(
    package: &Package,
    route: &Route,
    pending: &BTreeSet<PackageId>,
    working: &OrderedMap<PackageId, Package>,
) -> Vec<PackageId> {
    package
        .must_ship_with()
        .map(|group| {
            group
                .iter()
                .copied()
                .filter(|m| *m != package.id())
                .filter(|m| !route.contains(*m) && !pending.contains(m))
                .filter(|m| working.contains_key(m))
                .collect()
        })
        .unwrap_or_default()
}
