//! Per-vehicle static records and device identity metadata

use serde::{Deserialize, Serialize};

use crate::{Vin, DOMAIN, MANUFACTURER};

/// Upstream API generation, indicating which telemetry fields the
/// vehicle's onboard hardware supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiGeneration {
    /// First-generation telematics hardware
    G1,
    /// Second-generation telematics hardware
    G2,
}

/// Static per-vehicle record, created at config-entry setup from the API
/// client's vehicle enumeration and immutable for the lifetime of the entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleInfo {
    /// Unique per-vehicle key
    pub vin: Vin,

    /// Display name (user-chosen nickname or model name)
    pub name: String,

    /// Model name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Model year, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_year: Option<String>,

    /// Vehicle accepts remote commands (lock/unlock, fetch)
    pub has_remote_service: bool,

    /// Vehicle is an EV
    pub is_ev: bool,

    /// Telemetry API generation
    pub api_generation: ApiGeneration,

    /// Safety-plus subscription is active
    pub has_safety_plus: bool,
}

impl VehicleInfo {
    /// Device identity metadata for the host's device registry
    pub fn device_info(&self) -> DeviceInfo {
        let model = match (&self.model_year, &self.model_name) {
            (Some(year), Some(name)) => format!("{year} {name}"),
            (None, Some(name)) => name.clone(),
            _ => String::new(),
        };

        DeviceInfo {
            identifiers: (DOMAIN.to_string(), self.vin.to_string()),
            manufacturer: MANUFACTURER.to_string(),
            model,
            name: self.name.clone(),
        }
    }
}

/// Device identity metadata, consumed by the host's device registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// (domain, vin) identifier pair
    pub identifiers: (String, String),
    /// Manufacturer display string
    pub manufacturer: String,
    /// Model display string, possibly empty
    pub model: String,
    /// Device display name
    pub name: String,
}
