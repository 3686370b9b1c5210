//! Simulation context tying the graph, manifest, fleet and routes together.

use chrono::NaiveTime;
use tracing::{info, warn};

use super::DispatchPlan;
use crate::collections::OrderedMap;
use crate::constructive::build_route;
use crate::dependency::DependencyResolver;
use crate::distance::DistanceGraph;
use crate::error::RoutingError;
use crate::models::{Location, LocationId, Note, Package, PackageId, Route, Truck, TruckId};
use crate::projection::project_status;

/// One independent delivery simulation.
///
/// Loaders fill it with locations, distances, trucks and packages; it then
/// resolves notes, builds routes from a [`DispatchPlan`] and answers status
/// queries at any time of day. Several simulations can live side by side.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use package_routing::dispatch::{DeliverySimulation, DispatchPlan, RoutePlan};
/// use package_routing::models::{Deadline, LocationId, Package, PackageId, Status, Truck, TruckId};
///
/// let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let mut sim = DeliverySimulation::new();
/// sim.add_edge(LocationId::DEPOT, LocationId::new(2), 3.0);
/// sim.add_truck(Truck::new(TruckId::new(1)));
/// sim.add_package(
///     Package::new(PackageId::new(1), LocationId::new(2), Deadline::EndOfDay, 5.0)
///         .with_note("D 09:05"),
/// );
/// sim.apply_notes().unwrap();
///
/// let plan = DispatchPlan::new(vec![RoutePlan::new(at(9, 5), TruckId::new(1))]);
/// sim.generate_routes(&plan).unwrap();
///
/// sim.status_at(at(9, 0));
/// assert_eq!(sim.package(PackageId::new(1)).unwrap().status(), Status::Delayed(at(9, 5)));
/// sim.status_at(at(12, 0));
/// assert_eq!(sim.package(PackageId::new(1)).unwrap().status(), Status::Delivered(at(9, 15)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeliverySimulation {
    graph: DistanceGraph,
    packages: OrderedMap<PackageId, Package>,
    trucks: OrderedMap<TruckId, Truck>,
    locations: OrderedMap<LocationId, Location>,
    routes: Vec<Route>,
    unrouted: Vec<PackageId>,
}

impl DeliverySimulation {
    /// Creates an empty simulation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a location for display and as a graph node.
    pub fn add_location(&mut self, location: Location) {
        self.graph.add_node(location.id());
        self.locations.insert(location.id(), location);
    }

    /// Sets the distance between two locations.
    pub fn add_edge(&mut self, a: LocationId, b: LocationId, miles: f64) {
        self.graph.add_edge(a, b, miles);
    }

    /// Adds or replaces a truck in the fleet.
    pub fn add_truck(&mut self, truck: Truck) {
        self.trucks.insert(truck.id(), truck);
    }

    /// Adds or replaces a package in the manifest.
    pub fn add_package(&mut self, package: Package) {
        self.packages.insert(package.id(), package);
    }

    /// Parses every package note and applies the resulting constraints.
    ///
    /// All notes are parsed before any is applied, so an invalid note
    /// leaves the manifest untouched.
    ///
    /// Delays, address corrections and truck restrictions are applied per
    /// package; co-delivery notes are closed transitively and written back
    /// to every group member.
    pub fn apply_notes(&mut self) -> Result<(), RoutingError> {
        let mut notes: Vec<(PackageId, Note)> = Vec::new();
        for (&id, package) in &self.packages {
            let Some(text) = package.note() else {
                continue;
            };
            let note: Note = text
                .parse()
                .map_err(|_| RoutingError::InvalidNote(format!("package {}: {}", id, text)))?;
            notes.push((id, note));
        }

        let mut resolver = DependencyResolver::new();
        for (id, note) in &notes {
            if let Note::MustShipWith { ids } = note {
                resolver.relate_all(*id, ids.iter().copied());
            } else if let Some(package) = self.packages.get_mut(id) {
                package.apply_note(note);
            }
        }

        let groups = resolver.resolve();
        groups.apply(&mut self.packages);
        info!(
            "Applied notes to {} packages ({} co-delivery groups)",
            self.packages.len(),
            groups.groups().len()
        );
        Ok(())
    }

    /// Builds one route per plan entry from a shared pool of every package.
    ///
    /// Replaces any previously built routes. Packages no route could take
    /// are reported and listed by [`unrouted`](Self::unrouted).
    pub fn generate_routes(&mut self, plan: &DispatchPlan) -> Result<&[Route], RoutingError> {
        for entry in &plan.routes {
            if !self.trucks.contains_key(&entry.truck) {
                return Err(RoutingError::UnknownTruck(entry.truck));
            }
        }

        let mut working = self.packages.clone();
        let paths = self.graph.paths();
        let mut routes = Vec::with_capacity(plan.routes.len());
        for entry in &plan.routes {
            let truck = self
                .trucks
                .get(&entry.truck)
                .ok_or(RoutingError::UnknownTruck(entry.truck))?;
            routes.push(build_route(
                &mut working,
                paths,
                entry.start,
                truck,
                entry.skew,
            ));
        }

        self.unrouted = working.keys().copied().collect();
        if !self.unrouted.is_empty() {
            warn!(
                "{} packages left without a route: {:?}",
                self.unrouted.len(),
                self.unrouted
            );
        }
        self.routes = routes;
        Ok(&self.routes)
    }

    /// Projects package statuses and truck mileage to `target`.
    pub fn status_at(&mut self, target: NaiveTime) {
        project_status(&self.routes, &mut self.packages, &mut self.trucks, target);
    }

    /// Returns the package with `id`.
    pub fn package(&self, id: PackageId) -> Result<&Package, RoutingError> {
        self.packages.get(&id).ok_or(RoutingError::UnknownPackage(id))
    }

    /// Returns the truck with `id`.
    pub fn truck(&self, id: TruckId) -> Result<&Truck, RoutingError> {
        self.trucks.get(&id).ok_or(RoutingError::UnknownTruck(id))
    }

    /// Returns the location with `id`.
    pub fn location(&self, id: LocationId) -> Result<&Location, RoutingError> {
        self.locations.get(&id).ok_or(RoutingError::UnknownLocation(id))
    }

    /// Returns the manifest in insertion order.
    pub fn packages(&self) -> &OrderedMap<PackageId, Package> {
        &self.packages
    }

    /// Returns the fleet in insertion order.
    pub fn trucks(&self) -> &OrderedMap<TruckId, Truck> {
        &self.trucks
    }

    /// Returns the location graph.
    pub fn graph(&self) -> &DistanceGraph {
        &self.graph
    }

    /// Returns the location graph for edge updates.
    pub fn graph_mut(&mut self) -> &mut DistanceGraph {
        &mut self.graph
    }

    /// Returns the routes from the last [`generate_routes`](Self::generate_routes).
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Packages left in the pool after the last [`generate_routes`](Self::generate_routes).
    pub fn unrouted(&self) -> &[PackageId] {
        &self.unrouted
    }

    /// The route carrying `id`, if any.
    pub fn route_for(&self, id: PackageId) -> Option<&Route> {
        self.routes.iter().find(|r| r.contains(id))
    }

    /// Fleet mileage as of the last projection.
    pub fn total_mileage(&self) -> f64 {
        self.trucks.values().map(Truck::mileage).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::RoutePlan;
    use crate::models::{Deadline, Status};

    fn loc(id: u32) -> LocationId {
        LocationId::new(id)
    }

    fn pid(id: u32) -> PackageId {
        PackageId::new(id)
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    /// Hub 1 in the middle of a star; spoke k is k miles away and spokes
    /// connect only through the hub.
    fn star(sim: &mut DeliverySimulation, spokes: u32) {
        sim.add_location(Location::new(loc(1), "Hub"));
        for k in 2..=spokes + 1 {
            sim.add_location(Location::new(loc(k), format!("{} Spoke St", k)));
            sim.add_edge(loc(1), loc(k), f64::from(k - 1));
        }
    }

    fn scenario() -> DeliverySimulation {
        let mut sim = DeliverySimulation::new();
        star(&mut sim, 6);
        sim.add_truck(Truck::new(TruckId::new(1)).with_capacity(3));
        sim.add_truck(Truck::new(TruckId::new(2)).with_capacity(3));

        let packages = [
            (1, 2, Deadline::EndOfDay, ""),
            (2, 3, Deadline::By(hm(10, 30)), ""),
            (3, 4, Deadline::EndOfDay, "S 6"),
            (4, 5, Deadline::EndOfDay, "T 2"),
            (5, 6, Deadline::EndOfDay, "D 09:05"),
            (6, 7, Deadline::EndOfDay, ""),
            (7, 3, Deadline::EndOfDay, "W 10:20 2"),
        ];
        for (id, l, deadline, note) in packages {
            sim.add_package(Package::new(pid(id), loc(l), deadline, 1.0).with_note(note));
        }
        sim
    }

    fn plan() -> DispatchPlan {
        DispatchPlan::new(vec![
            RoutePlan::new(hm(8, 0), TruckId::new(1)).with_skew(1.0),
            RoutePlan::new(hm(9, 5), TruckId::new(2)),
            RoutePlan::new(hm(10, 20), TruckId::new(1)),
        ])
    }

    #[test]
    fn test_apply_notes() {
        let mut sim = scenario();
        sim.apply_notes().expect("valid notes");

        let p7 = sim.package(pid(7)).expect("present");
        assert_eq!(p7.location(), loc(2));
        assert_eq!(p7.delayed_until(), Some(hm(10, 20)));

        let p6 = sim.package(pid(6)).expect("present");
        assert!(p6.must_ship_with().is_some_and(|g| g.contains(&pid(3))));
        assert_eq!(
            sim.package(pid(4)).expect("present").truck_only(),
            Some(TruckId::new(2))
        );
    }

    #[test]
    fn test_invalid_note() {
        let mut sim = scenario();
        sim.add_package(Package::new(pid(8), loc(2), Deadline::EndOfDay, 1.0).with_note("Z"));
        assert!(matches!(
            sim.apply_notes(),
            Err(RoutingError::InvalidNote(msg)) if msg.contains("package 8")
        ));
    }

    #[test]
    fn test_invalid_note_leaves_manifest_untouched() {
        let mut sim = scenario();
        sim.add_package(Package::new(pid(8), loc(2), Deadline::EndOfDay, 1.0).with_note("D 9"));
        let before = sim.packages().clone();

        assert!(sim.apply_notes().is_err());
        for (id, package) in &before {
            assert_eq!(sim.package(*id), Ok(package));
        }
        let p7 = sim.package(pid(7)).expect("present");
        assert_eq!(p7.location(), loc(3));
        assert!(p7.constraints().is_empty());
    }

    #[test]
    fn test_unknown_truck_in_plan() {
        let mut sim = scenario();
        let plan = DispatchPlan::new(vec![RoutePlan::new(hm(8, 0), TruckId::new(9))]);
        assert_eq!(
            sim.generate_routes(&plan).map(|r| r.len()),
            Err(RoutingError::UnknownTruck(TruckId::new(9)))
        );
    }

    #[test]
    fn test_every_package_routed_once() {
        let mut sim = scenario();
        sim.apply_notes().expect("valid notes");
        sim.generate_routes(&plan()).expect("known trucks");

        assert!(sim.unrouted().is_empty());
        let mut seen: Vec<PackageId> = sim.routes().iter().flat_map(|r| r.package_ids()).collect();
        seen.sort();
        assert_eq!(seen, (1..=7).map(pid).collect::<Vec<_>>());

        for route in sim.routes() {
            for id in route.package_ids() {
                let p = sim.package(id).expect("present");
                assert!(p.is_available_at(route.start()));
                assert!(p.can_ride(route.truck()));
            }
        }

        let r3 = sim.route_for(pid(3)).expect("routed");
        assert!(r3.contains(pid(6)));
        assert_eq!(sim.route_for(pid(4)).map(|r| r.truck()), Some(TruckId::new(2)));
        assert_eq!(sim.route_for(pid(7)).map(|r| r.start()), Some(hm(10, 20)));
    }

    #[test]
    fn test_status_over_the_day() {
        let mut sim = scenario();
        sim.apply_notes().expect("valid notes");
        sim.generate_routes(&plan()).expect("known trucks");

        sim.status_at(hm(7, 0));
        assert_eq!(sim.total_mileage(), 0.0);
        assert_eq!(
            sim.package(pid(5)).expect("present").status(),
            Status::Delayed(hm(9, 5))
        );

        sim.status_at(hm(23, 0));
        for (_, p) in sim.packages() {
            assert!(matches!(p.status(), Status::Delivered(_)), "{:?}", p.id());
        }
        let expected: f64 = sim.routes().iter().map(Route::total_distance).sum();
        assert!((sim.total_mileage() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_left_short_is_reported() {
        let mut sim = scenario();
        sim.apply_notes().expect("valid notes");
        let plan = DispatchPlan::new(vec![RoutePlan::new(hm(8, 0), TruckId::new(1))]);
        sim.generate_routes(&plan).expect("known trucks");
        assert!(!sim.unrouted().is_empty());
        assert!(sim.unrouted().contains(&pid(4)));
    }

    #[test]
    fn test_lookups() {
        let sim = scenario();
        assert_eq!(sim.location(loc(3)).map(|l| l.address()), Ok("3 Spoke St"));
        assert_eq!(
            sim.location(loc(99)).map(|l| l.id()),
            Err(RoutingError::UnknownLocation(loc(99)))
        );
        assert!(sim.truck(TruckId::new(2)).is_ok());
        assert_eq!(
            sim.package(pid(42)).map(|p| p.id()),
            Err(RoutingError::UnknownPackage(pid(42)))
        );
        assert_eq!(sim.graph().node_count(), 7);
        assert_eq!(sim.trucks().len(), 2);
    }
}
