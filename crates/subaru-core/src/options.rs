//! Per-entry integration options
//!
//! Options are stored and edited by the host; this engine only reads
//! them. The notification preference is read at command-dispatch time,
//! the measurement system at normalization time, and the two intervals
//! by the coordinator's refresh loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::MeasurementSystem;

/// How the upstream service notifies the user about remote commands
///
/// Passed through to the API client unchanged; the client is responsible
/// for honoring it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPreference {
    /// Notify only when a command fails
    #[default]
    Failure,
    /// Temporary notification while a command is pending
    Pending,
    /// Notify on success as well
    Success,
}

/// Default seconds between display refreshes (read cached report)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Default seconds between vehicle-initiated reports (ask the car to
/// push fresh telemetry; slow and rate-limited upstream)
pub const DEFAULT_VEHICLE_REPORT_INTERVAL_SECS: u64 = 7200;

/// Options attached to one config entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationOptions {
    /// Remote-command notification preference
    pub notification: NotificationPreference,

    /// Measurement system used for displayed sensor values
    pub measurement_system: MeasurementSystem,

    /// Seconds between refresh cycles (get_data)
    pub poll_interval_secs: u64,

    /// Seconds a vehicle-initiated report stays fresh before the next
    /// refresh cycle asks the vehicle for a new one (fetch)
    pub vehicle_report_interval_secs: u64,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            notification: NotificationPreference::default(),
            measurement_system: MeasurementSystem::default(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            vehicle_report_interval_secs: DEFAULT_VEHICLE_REPORT_INTERVAL_SECS,
        }
    }
}

impl IntegrationOptions {
    /// Refresh-cycle interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Vehicle-report threshold as a Duration
    pub fn vehicle_report_interval(&self) -> Duration {
        Duration::from_secs(self.vehicle_report_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = IntegrationOptions::default();
        assert_eq!(options.notification, NotificationPreference::Failure);
        assert_eq!(options.measurement_system, MeasurementSystem::Metric);
        assert_eq!(options.poll_interval(), Duration::from_secs(300));
        assert_eq!(options.vehicle_report_interval(), Duration::from_secs(7200));
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let options: IntegrationOptions =
            serde_json::from_str(r#"{"notification": "success"}"#).unwrap();
        assert_eq!(options.notification, NotificationPreference::Success);
        assert_eq!(options.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_serde_rename_all() {
        let json = serde_json::to_string(&NotificationPreference::Failure).unwrap();
        assert_eq!(json, "\"failure\"");
    }
}
