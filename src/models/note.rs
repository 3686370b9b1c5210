//! Structured package notes.
//!
//! Loaders hand notes over in a compact tagged form, one tag per note:
//!
//! | Text | Meaning |
//! |---|---|
//! | *(empty)* | no special handling |
//! | `D 09:05` | package reaches the hub at 09:05 |
//! | `W 10:20 19` | address corrected to location 19 at 10:20 |
//! | `S 13,15` | must ship with packages 13 and 15 |
//! | `T 2` | may only ride truck 2 |

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveTime;

use super::{LocationId, PackageId, TruckId};
use crate::error::RoutingError;

/// A parsed package note.
///
/// # Examples
///
/// ```
/// use package_routing::models::{Note, TruckId};
///
/// let note: Note = "T 2".parse().unwrap();
/// assert_eq!(note, Note::TruckOnly { truck: TruckId::new(2) });
/// assert_eq!("".parse::<Note>().unwrap(), Note::None);
/// assert!("X 1".parse::<Note>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Note {
    #[default]
    None,
    /// Not at the hub before `until`.
    Delayed { until: NaiveTime },
    /// Listed address is wrong; the correct one is known at `corrected_at`.
    WrongAddress {
        corrected_location: LocationId,
        corrected_at: NaiveTime,
    },
    /// Must travel on the same route as every listed package.
    MustShipWith { ids: BTreeSet<PackageId> },
    /// May only be loaded on `truck`.
    TruckOnly { truck: TruckId },
}

impl FromStr for Note {
    type Err = RoutingError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Note::None);
        }
        let invalid = || RoutingError::InvalidNote(text.to_string());

        let mut parts = text.split_whitespace();
        let tag = parts.next().ok_or_else(invalid)?;
        let args: Vec<&str> = parts.collect();

        match (tag, args.as_slice()) {
            ("D", [time]) => Ok(Note::Delayed {
                until: parse_time(time).ok_or_else(invalid)?,
            }),
            ("W", [time, location]) => Ok(Note::WrongAddress {
                corrected_location: location.parse::<u32>().map_err(|_| invalid())?.into(),
                corrected_at: parse_time(time).ok_or_else(invalid)?,
            }),
            ("S", [ids]) => {
                let ids = ids
                    .split(',')
                    .map(|id| id.trim().parse::<u32>().map(PackageId::new))
                    .collect::<Result<BTreeSet<_>, _>>()
                    .map_err(|_| invalid())?;
                Ok(Note::MustShipWith { ids })
            }
            ("T", [truck]) => Ok(Note::TruckOnly {
                truck: truck.parse::<u32>().map_err(|_| invalid())?.into(),
            }),
            _ => Err(invalid()),
        }
    }
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M").ok()
}
