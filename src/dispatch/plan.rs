//! Operator-supplied route plans.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::models::TruckId;

/// One route to build: when it leaves, which truck runs it, and how hard
/// to favour deadline-bound packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub start: NaiveTime,
    pub truck: TruckId,
    /// Miles subtracted from deadline-bound candidates during selection.
    #[serde(default)]
    pub skew: f64,
}

impl RoutePlan {
    /// Creates a plan entry with no deadline skew.
    pub fn new(start: NaiveTime, truck: TruckId) -> Self {
        Self {
            start,
            truck,
            skew: 0.0,
        }
    }

    /// Sets the deadline skew in miles.
    pub fn with_skew(mut self, skew: f64) -> Self {
        self.skew = skew;
        self
    }
}

/// Routes to build, in order; earlier routes pick from the pool first.
///
/// # Examples
///
/// ```
/// use package_routing::dispatch::DispatchPlan;
/// use package_routing::models::TruckId;
///
/// let plan = DispatchPlan::from_json(r#"{
///     "routes": [
///         { "start": "08:00:00", "truck": 1, "skew": 2.5 },
///         { "start": "09:05:00", "truck": 2 }
///     ]
/// }"#).unwrap();
/// assert_eq!(plan.routes.len(), 2);
/// assert_eq!(plan.routes[1].truck, TruckId::new(2));
/// assert_eq!(plan.routes[1].skew, 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchPlan {
    pub routes: Vec<RoutePlan>,
}

impl DispatchPlan {
    /// Creates a plan from routes in build order.
    pub fn new(routes: Vec<RoutePlan>) -> Self {
        Self { routes }
    }

    /// Reads a plan from JSON.
    pub fn from_json(json: &str) -> Result<Self, RoutingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the plan as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RoutingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_json_round_trip() {
        let plan = DispatchPlan::new(vec![
            RoutePlan::new(NaiveTime::from_hms_opt(8, 0, 0).expect("valid"), TruckId::new(1))
                .with_skew(3.0),
        ]);
        let json = plan.to_json().expect("serializable");
        assert!(json.contains("\"08:00:00\""));
        assert_eq!(DispatchPlan::from_json(&json).expect("valid"), plan);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            DispatchPlan::from_json("{\"routes\": [{\"truck\": 1}]}"),
            Err(RoutingError::Config(_))
        ));
    }
}
