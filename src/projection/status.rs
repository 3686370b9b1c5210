//! Point-in-time delivery status derived from built routes.

use chrono::NaiveTime;
use tracing::warn;

use crate::collections::OrderedMap;
use crate::models::{Package, PackageId, Route, Status, Truck, TruckId};

/// Sets every package's status and every truck's mileage as of `target`.
///
/// Packages on a route that has left the hub are `Delivered` at their stop
/// time if it is at or before `target`, otherwise `EnRoute`. Packages on a
/// route still at the hub, or on no route at all, are `Delayed` if they
/// have not reached the hub by `target` and `AtHub` otherwise.
///
/// Truck mileage is reset, then each started route adds the cumulative
/// distance of the furthest stop reached by `target`. The projection reads
/// routes only, so it can be repeated for any target time.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use package_routing::collections::OrderedMap;
/// use package_routing::constructive::build_route;
/// use package_routing::distance::DistanceGraph;
/// use package_routing::models::{Deadline, LocationId, Package, PackageId, Status, Truck, TruckId};
/// use package_routing::projection::project_status;
///
/// let mut graph = DistanceGraph::new();
/// graph.add_edge(LocationId::DEPOT, LocationId::new(2), 9.0);
///
/// let id = PackageId::new(1);
/// let mut packages = OrderedMap::new();
/// packages.insert(id, Package::new(id, LocationId::new(2), Deadline::EndOfDay, 1.0));
/// let truck = Truck::new(TruckId::new(1));
/// let mut trucks = OrderedMap::new();
/// trucks.insert(truck.id(), truck.clone());
///
/// let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let mut working = packages.clone();
/// let routes = vec![build_route(&mut working, graph.paths(), at(8, 0), &truck, 0.0)];
///
/// project_status(&routes, &mut packages, &mut trucks, at(8, 15));
/// assert_eq!(packages.get(&id).unwrap().status(), Status::EnRoute(TruckId::new(1)));
///
/// project_status(&routes, &mut packages, &mut trucks, at(9, 0));
/// assert_eq!(packages.get(&id).unwrap().status(), Status::Delivered(at(8, 30)));
/// assert_eq!(trucks.get(&TruckId::new(1)).unwrap().mileage(), 18.0);
/// ```
pub fn project_status(
    routes: &[Route],
    packages: &mut OrderedMap<PackageId, Package>,
    trucks: &mut OrderedMap<TruckId, Truck>,
    target: NaiveTime,
) {
    for truck in trucks.values_mut() {
        truck.reset_mileage();
    }
    for package in packages.values_mut() {
        let status = waiting_status(package, target);
        package.set_status(status);
    }

    for route in routes {
        if route.start() > target {
            continue;
        }

        let mut reached = 0.0;
        for stop in route.stops() {
            let delivered = stop.time <= target;
            if delivered {
                reached = stop.distance;
            }
            let Some(id) = stop.package_id() else {
                continue;
            };
            let Some(package) = packages.get_mut(&id) else {
                warn!("Route for truck {} carries unknown package {}", route.truck(), id);
                continue;
            };
            package.set_status(if delivered {
                Status::Delivered(stop.time)
            } else {
                Status::EnRoute(route.truck())
            });
        }

        match trucks.get_mut(&route.truck()) {
            Some(truck) => truck.add_mileage(reached),
            None => warn!("Route references unknown truck {}", route.truck()),
        }
    }
}

/// Status of a package that has not left the hub by `target`.
fn waiting_status(package: &Package, target: NaiveTime) -> Status {
    match package.delayed_until() {
        Some(until) if until > target => Status::Delayed(until),
        _ => Status::AtHub,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructive::build_route;
    use crate::distance::DistanceGraph;
    use crate::models::{Constraint, Deadline, LocationId};

    fn loc(id: u32) -> LocationId {
        LocationId::new(id)
    }

    fn pid(id: u32) -> PackageId {
        PackageId::new(id)
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    struct Fixture {
        packages: OrderedMap<PackageId, Package>,
        trucks: OrderedMap<TruckId, Truck>,
        routes: Vec<Route>,
    }

    /// Hub 1 and locations 2, 3, 4 on a line, 3 miles apart (10 min at 18 mph).
    /// Truck 1 leaves at 8:00 with packages 1 and 2; truck 2 leaves at 10:00
    /// with package 3, which is delayed until 9:30. Package 4 is never routed.
    fn fixture() -> Fixture {
        let mut g = DistanceGraph::new();
        g.add_edge(loc(1), loc(2), 3.0);
        g.add_edge(loc(2), loc(3), 3.0);
        g.add_edge(loc(3), loc(4), 3.0);

        let mut packages: OrderedMap<PackageId, Package> = [(1, 2), (2, 3), (3, 4), (4, 4)]
            .into_iter()
            .map(|(id, l)| (pid(id), Package::new(pid(id), loc(l), Deadline::EndOfDay, 1.0)))
            .collect();
        if let Some(p) = packages.get_mut(&pid(3)) {
            p.add_constraint(Constraint::DelayedUntil(hm(9, 30)));
        }
        if let Some(p) = packages.get_mut(&pid(4)) {
            p.add_constraint(Constraint::DelayedUntil(hm(11, 0)));
        }

        let trucks: OrderedMap<TruckId, Truck> = [1, 2]
            .into_iter()
            .map(|t| (TruckId::new(t), Truck::new(TruckId::new(t))))
            .collect();

        let mut first: OrderedMap<PackageId, Package> = packages
            .iter()
            .filter(|(id, _)| id.get() <= 2)
            .map(|(id, p)| (*id, p.clone()))
            .collect();
        let mut second: OrderedMap<PackageId, Package> = packages
            .iter()
            .filter(|(id, _)| id.get() == 3)
            .map(|(id, p)| (*id, p.clone()))
            .collect();

        let paths = g.paths();
        let r1 = build_route(&mut first, paths, hm(8, 0), &Truck::new(TruckId::new(1)), 0.0);
        let r2 = build_route(&mut second, paths, hm(10, 0), &Truck::new(TruckId::new(2)), 0.0);

        Fixture {
            packages,
            trucks,
            routes: vec![r1, r2],
        }
    }

    fn status(f: &Fixture, id: u32) -> Status {
        f.packages.get(&pid(id)).map(|p| p.status()).expect("present")
    }

    fn mileage(f: &Fixture, id: u32) -> f64 {
        f.trucks.get(&TruckId::new(id)).map(|t| t.mileage()).expect("present")
    }

    #[test]
    fn test_before_any_route() {
        let mut f = fixture();
        project_status(&f.routes, &mut f.packages, &mut f.trucks, hm(7, 0));
        assert_eq!(status(&f, 1), Status::AtHub);
        assert_eq!(status(&f, 2), Status::AtHub);
        assert_eq!(status(&f, 3), Status::Delayed(hm(9, 30)));
        assert_eq!(mileage(&f, 1), 0.0);
    }

    #[test]
    fn test_mid_route() {
        let mut f = fixture();
        project_status(&f.routes, &mut f.packages, &mut f.trucks, hm(8, 15));
        assert_eq!(status(&f, 1), Status::Delivered(hm(8, 10)));
        assert_eq!(status(&f, 2), Status::EnRoute(TruckId::new(1)));
        assert_eq!(mileage(&f, 1), 3.0);
        assert_eq!(mileage(&f, 2), 0.0);
    }

    #[test]
    fn test_stop_at_exact_target_delivered() {
        let mut f = fixture();
        project_status(&f.routes, &mut f.packages, &mut f.trucks, hm(8, 20));
        assert_eq!(status(&f, 2), Status::Delivered(hm(8, 20)));
        assert_eq!(mileage(&f, 1), 6.0);
    }

    #[test]
    fn test_later_route_waits_at_hub() {
        let mut f = fixture();
        project_status(&f.routes, &mut f.packages, &mut f.trucks, hm(9, 45));
        // Delay has passed but truck 2 has not left yet.
        assert_eq!(status(&f, 3), Status::AtHub);
        assert_eq!(status(&f, 4), Status::Delayed(hm(11, 0)));
        // Truck 1 is back at the hub after 12 miles.
        assert_eq!(mileage(&f, 1), 12.0);
    }

    #[test]
    fn test_after_everything() {
        let mut f = fixture();
        project_status(&f.routes, &mut f.packages, &mut f.trucks, hm(17, 0));
        assert!(matches!(status(&f, 1), Status::Delivered(_)));
        assert!(matches!(status(&f, 2), Status::Delivered(_)));
        assert_eq!(status(&f, 3), Status::Delivered(hm(10, 30)));
        assert_eq!(status(&f, 4), Status::AtHub);
        assert_eq!(mileage(&f, 2), 18.0);
    }

    #[test]
    fn test_projection_is_repeatable() {
        let mut f = fixture();
        project_status(&f.routes, &mut f.packages, &mut f.trucks, hm(17, 0));
        project_status(&f.routes, &mut f.packages, &mut f.trucks, hm(8, 15));
        assert_eq!(status(&f, 2), Status::EnRoute(TruckId::new(1)));
        assert_eq!(status(&f, 3), Status::Delayed(hm(9, 30)));
        assert_eq!(mileage(&f, 1), 3.0);
    }

    #[test]
    fn test_shared_truck_accumulates() {
        let mut f = fixture();
        let mut g = DistanceGraph::new();
        g.add_edge(loc(1), loc(2), 3.0);
        let late_package = Package::new(pid(9), loc(2), Deadline::EndOfDay, 1.0);
        f.packages.insert(pid(9), late_package.clone());
        let mut pool: OrderedMap<PackageId, Package> = OrderedMap::new();
        pool.insert(pid(9), late_package);
        let late = build_route(&mut pool, g.paths(), hm(12, 0), &Truck::new(TruckId::new(1)), 0.0);
        f.routes.push(late);

        project_status(&f.routes, &mut f.packages, &mut f.trucks, hm(17, 0));
        // 12 miles in the morning plus 6 at noon.
        assert_eq!(mileage(&f, 1), 18.0);
    }
}
