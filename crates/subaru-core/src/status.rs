//! Raw vehicle telemetry payload
//!
//! A VehicleStatus is the upstream API's report for one vehicle at one
//! fetch cycle. It is replaced wholesale on every successful fetch; the
//! coordinator retains the previous copy when a fetch fails.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw field names used by the upstream API
pub mod fields {
    pub const ODOMETER: &str = "ODOMETER";
    pub const AVG_FUEL_CONSUMPTION: &str = "AVG_FUEL_CONSUMPTION";
    pub const DIST_TO_EMPTY: &str = "DIST_TO_EMPTY";
    pub const EXTERNAL_TEMP: &str = "EXTERNAL_TEMP";
    pub const EV_CHARGE_PERCENT: &str = "EV_CHARGE_PERCENT";
    pub const EV_DISTANCE_TO_EMPTY: &str = "EV_DISTANCE_TO_EMPTY";
    pub const EV_TIME_TO_FULLY_CHARGED: &str = "EV_TIME_TO_FULLY_CHARGED";
    pub const TIRE_PRESSURE_FL: &str = "TYRE_PRESSURE_FRONT_LEFT";
    pub const TIRE_PRESSURE_FR: &str = "TYRE_PRESSURE_FRONT_RIGHT";
    pub const TIRE_PRESSURE_RL: &str = "TYRE_PRESSURE_REAR_LEFT";
    pub const TIRE_PRESSURE_RR: &str = "TYRE_PRESSURE_REAR_RIGHT";
    pub const TIMESTAMP: &str = "TIMESTAMP";
}

/// Raw telemetry payload for one vehicle at one fetch cycle
///
/// Fields the vehicle does not support are simply absent. The upstream
/// API is inconsistent about numeric encoding, so numeric access accepts
/// both JSON numbers and numbers-as-strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleStatus {
    values: HashMap<String, Value>,
}

impl VehicleStatus {
    /// Create a payload from raw field values
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    /// Get a raw field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Get a numeric field value, tolerating string-encoded numbers
    ///
    /// Returns None for absent fields, nulls, and non-numeric values.
    /// Zero and negative readings are valid values, not missing data.
    pub fn metric(&self, field: &str) -> Option<f64> {
        match self.values.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// True if the payload carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of fields in the payload
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Builder-style insert, used when assembling test payloads
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }
}
