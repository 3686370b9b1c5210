//! Package, deadline, constraint and status types.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{LocationId, Note, PackageId, TruckId};

/// Delivery deadline.
///
/// Orders `By` times chronologically, with `EndOfDay` after all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deadline {
    By(NaiveTime),
    EndOfDay,
}

impl Deadline {
    /// Returns `true` for deadlines earlier than end of day.
    pub fn is_bound(&self) -> bool {
        matches!(self, Deadline::By(_))
    }
}

impl PartialOrd for Deadline {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Deadline {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Deadline::By(a), Deadline::By(b)) => a.cmp(b),
            (Deadline::By(_), Deadline::EndOfDay) => Ordering::Less,
            (Deadline::EndOfDay, Deadline::By(_)) => Ordering::Greater,
            (Deadline::EndOfDay, Deadline::EndOfDay) => Ordering::Equal,
        }
    }
}

/// A typed routing constraint on a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// Not available for loading before this time.
    DelayedUntil(NaiveTime),
    /// The listed address was replaced by this location.
    WrongAddress(LocationId),
    /// May only ride this truck.
    TruckOnly(TruckId),
    /// Must ride the same route as these packages (never including itself).
    MustShipWith(BTreeSet<PackageId>),
}

impl Constraint {
    fn same_kind(&self, other: &Constraint) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Point-in-time state of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    AtHub,
    /// Not yet at the hub; arrives at the given time.
    Delayed(NaiveTime),
    EnRoute(TruckId),
    Delivered(NaiveTime),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::AtHub => write!(f, "at hub"),
            Status::Delayed(t) => write!(f, "delayed until {}", t.format("%H:%M")),
            Status::EnRoute(truck) => write!(f, "en route on truck {}", truck),
            Status::Delivered(t) => write!(f, "delivered at {}", t.format("%H:%M")),
        }
    }
}

/// A package in the delivery manifest.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use package_routing::models::{Deadline, LocationId, Package, PackageId, Status};
///
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let mut p = Package::new(PackageId::new(1), LocationId::new(4), Deadline::EndOfDay, 2.0);
/// p.apply_note(&"W 10:20 19".parse().unwrap());
///
/// assert_eq!(p.location(), LocationId::new(19));
/// assert!(!p.is_available_at(nine));
/// assert!(matches!(p.status(), Status::Delayed(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    id: PackageId,
    location: LocationId,
    deadline: Deadline,
    mass: f64,
    note: Option<String>,
    constraints: Vec<Constraint>,
    status: Status,
}

impl Package {
    /// Creates an unconstrained package waiting at the hub.
    pub fn new(id: PackageId, location: LocationId, deadline: Deadline, mass: f64) -> Self {
        Self {
            id,
            location,
            deadline,
            mass,
            note: None,
            constraints: Vec::new(),
            status: Status::AtHub,
        }
    }

    /// Attaches the raw note text as received from the loader.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() {
            None
        } else {
            Some(note)
        };
        self
    }

    /// Returns the package identifier.
    pub fn id(&self) -> PackageId {
        self.id
    }

    /// Delivery location (already corrected for wrong addresses).
    pub fn location(&self) -> LocationId {
        self.location
    }

    /// Returns the delivery deadline.
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Returns the package mass as listed in the manifest.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Raw note text, if any.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the active constraints.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns the status as of the last projection.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Overwrites the status.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Adds a constraint, replacing any existing one of the same kind.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.retain(|c| !c.same_kind(&constraint));
        self.constraints.push(constraint);
    }

    /// Removes every constraint of the same kind as `kind`.
    pub fn remove_constraint(&mut self, kind: &Constraint) {
        self.constraints.retain(|c| !c.same_kind(kind));
    }

    /// Returns the time the package reaches the hub, if delayed.
    pub fn delayed_until(&self) -> Option<NaiveTime> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::DelayedUntil(t) => Some(*t),
            _ => None,
        })
    }

    /// Returns the only truck allowed to carry the package, if restricted.
    pub fn truck_only(&self) -> Option<TruckId> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::TruckOnly(t) => Some(*t),
            _ => None,
        })
    }

    /// Location the listed address was corrected to, if it was wrong.
    pub fn corrected_location(&self) -> Option<LocationId> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::WrongAddress(l) => Some(*l),
            _ => None,
        })
    }

    /// Co-delivery group excluding this package; `None` when unconstrained.
    pub fn must_ship_with(&self) -> Option<&BTreeSet<PackageId>> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::MustShipWith(ids) => Some(ids),
            _ => None,
        })
    }

    /// Returns `true` if the package is at the hub by `time`.
    pub fn is_available_at(&self, time: NaiveTime) -> bool {
        self.delayed_until().is_none_or(|t| t <= time)
    }

    /// Returns `true` if the package may be loaded onto `truck`.
    pub fn can_ride(&self, truck: TruckId) -> bool {
        self.truck_only().is_none_or(|t| t == truck)
    }

    /// Applies a parsed note.
    ///
    /// A wrong address moves the package to the corrected location and
    /// holds it until the correction time. Co-delivery notes are left to
    /// the dependency resolver.
    pub fn apply_note(&mut self, note: &Note) {
        match note {
            Note::None | Note::MustShipWith { .. } => {}
            Note::Delayed { until } => {
                self.add_constraint(Constraint::DelayedUntil(*until));
                self.status = Status::Delayed(*until);
            }
            Note::WrongAddress {
                corrected_location,
                corrected_at,
            } => {
                self.location = *corrected_location;
                self.add_constraint(Constraint::WrongAddress(*corrected_location));
                self.add_constraint(Constraint::DelayedUntil(*corrected_at));
                self.status = Status::Delayed(*corrected_at);
            }
            Note::TruckOnly { truck } => {
                self.add_constraint(Constraint::TruckOnly(*truck));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    fn package() -> Package {
        Package::new(PackageId::new(1), LocationId::new(5), Deadline::EndOfDay, 21.0)
    }

    #[test]
    fn test_deadline_order() {
        assert!(Deadline::By(hm(9, 0)) < Deadline::By(hm(10, 30)));
        assert!(Deadline::By(hm(23, 59)) < Deadline::EndOfDay);
        assert!(Deadline::By(hm(9, 0)).is_bound());
        assert!(!Deadline::EndOfDay.is_bound());
    }

    #[test]
    fn test_new_package_unconstrained() {
        let p = package();
        assert_eq!(p.status(), Status::AtHub);
        assert!(p.constraints().is_empty());
        assert!(p.must_ship_with().is_none());
        assert!(p.is_available_at(hm(8, 0)));
        assert!(p.can_ride(TruckId::new(3)));
    }

    #[test]
    fn test_empty_note_text_dropped() {
        let p = package().with_note("  ");
        assert!(p.note().is_none());
        let p = package().with_note("D 09:05");
        assert_eq!(p.note(), Some("D 09:05"));
    }

    #[test]
    fn test_apply_delayed() {
        let mut p = package();
        p.apply_note(&Note::Delayed { until: hm(9, 5) });
        assert_eq!(p.delayed_until(), Some(hm(9, 5)));
        assert_eq!(p.status(), Status::Delayed(hm(9, 5)));
        assert!(!p.is_available_at(hm(9, 4)));
        assert!(p.is_available_at(hm(9, 5)));
    }

    #[test]
    fn test_apply_wrong_address() {
        let mut p = package();
        p.apply_note(&Note::WrongAddress {
            corrected_location: LocationId::new(19),
            corrected_at: hm(10, 20),
        });
        assert_eq!(p.location(), LocationId::new(19));
        assert_eq!(p.corrected_location(), Some(LocationId::new(19)));
        assert_eq!(p.delayed_until(), Some(hm(10, 20)));
    }

    #[test]
    fn test_apply_truck_only() {
        let mut p = package();
        p.apply_note(&Note::TruckOnly {
            truck: TruckId::new(2),
        });
        assert!(p.can_ride(TruckId::new(2)));
        assert!(!p.can_ride(TruckId::new(1)));
    }

    #[test]
    fn test_constraint_replaced_by_kind() {
        let mut p = package();
        p.add_constraint(Constraint::DelayedUntil(hm(9, 0)));
        p.add_constraint(Constraint::TruckOnly(TruckId::new(1)));
        p.add_constraint(Constraint::DelayedUntil(hm(10, 0)));
        assert_eq!(p.constraints().len(), 2);
        assert_eq!(p.delayed_until(), Some(hm(10, 0)));

        p.remove_constraint(&Constraint::TruckOnly(TruckId::new(0)));
        assert!(p.truck_only().is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::AtHub.to_string(), "at hub");
        assert_eq!(Status::Delivered(hm(9, 7)).to_string(), "delivered at 09:07");
        assert_eq!(
            Status::EnRoute(TruckId::new(2)).to_string(),
            "en route on truck 2"
        );
    }
}
