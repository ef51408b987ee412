//! Sensor readings as exposed to the host platform

use serde::Serialize;

use subaru_core::{display_unit, normalize, MeasurementSystem, VehicleStatus};

use crate::descriptor::{DeviceClass, SensorDescriptor};

/// One sensor's state as read by the host entity contract
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    /// Normalized display value; None when the field is absent from the
    /// payload or the payload itself is missing
    pub value: Option<f64>,
    /// Display unit for the configured measurement system
    pub unit: &'static str,
    /// Host device class
    pub device_class: Option<DeviceClass>,
    /// False only when no payload is cached for the vehicle at all
    pub available: bool,
}

/// Build the reading for one descriptor from the cached payload
///
/// A cached payload that lacks this particular field yields an available
/// reading with no value; a missing payload yields an unavailable one.
pub fn reading(
    descriptor: &SensorDescriptor,
    status: Option<&VehicleStatus>,
    system: MeasurementSystem,
) -> SensorReading {
    let raw = status.and_then(|s| s.metric(descriptor.field));

    SensorReading {
        value: normalize(raw, descriptor.raw_unit, system),
        unit: display_unit(descriptor.raw_unit, system),
        device_class: descriptor.device_class,
        available: status.is_some(),
    }
}
