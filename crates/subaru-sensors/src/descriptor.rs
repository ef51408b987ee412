//! Sensor definitions and capability gating

use serde::{Deserialize, Serialize};

use subaru_core::{fields, ApiGeneration, RawUnit, VehicleInfo};

/// Host device class a sensor reading maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Battery,
    Distance,
    Duration,
    Pressure,
    Temperature,
}

/// Capability a vehicle must have for a sensor to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityRequirement {
    /// Requires an active safety-plus subscription
    SafetyPlus,
    /// Requires second-generation telematics hardware
    ApiGen2,
    /// Requires an EV powertrain
    Ev,
}

impl CapabilityRequirement {
    /// Whether the vehicle's capability flags satisfy this requirement
    pub fn matches(&self, vehicle: &VehicleInfo) -> bool {
        match self {
            Self::SafetyPlus => vehicle.has_safety_plus,
            Self::ApiGen2 => vehicle.api_generation >= ApiGeneration::G2,
            Self::Ev => vehicle.is_ev,
        }
    }
}

/// Immutable definition of one sensor
///
/// `key` is the stable identifier persisted in unique IDs; `name` is the
/// display name (and the suffix of the legacy unique-ID scheme); `field`
/// is the raw payload field the value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub field: &'static str,
    pub raw_unit: RawUnit,
    pub device_class: Option<DeviceClass>,
    pub requirement: CapabilityRequirement,
}

/// Sensors available with a safety-plus subscription
pub const SAFETY_SENSORS: &[SensorDescriptor] = &[SensorDescriptor {
    key: "odometer",
    name: "Odometer",
    field: fields::ODOMETER,
    raw_unit: RawUnit::Kilometers,
    device_class: Some(DeviceClass::Distance),
    requirement: CapabilityRequirement::SafetyPlus,
}];

/// Sensors available on second-generation telematics hardware
pub const API_GEN_2_SENSORS: &[SensorDescriptor] = &[
    SensorDescriptor {
        key: "average_fuel_consumption",
        name: "Avg fuel consumption",
        field: fields::AVG_FUEL_CONSUMPTION,
        raw_unit: RawUnit::LitersPer100Km,
        device_class: None,
        requirement: CapabilityRequirement::ApiGen2,
    },
    SensorDescriptor {
        key: "range",
        name: "Range",
        field: fields::DIST_TO_EMPTY,
        raw_unit: RawUnit::Kilometers,
        device_class: Some(DeviceClass::Distance),
        requirement: CapabilityRequirement::ApiGen2,
    },
    SensorDescriptor {
        key: "external_temp",
        name: "External temp",
        field: fields::EXTERNAL_TEMP,
        raw_unit: RawUnit::Celsius,
        device_class: Some(DeviceClass::Temperature),
        requirement: CapabilityRequirement::ApiGen2,
    },
    SensorDescriptor {
        key: "tire_pressure_fl",
        name: "Tire pressure FL",
        field: fields::TIRE_PRESSURE_FL,
        raw_unit: RawUnit::Hectopascals,
        device_class: Some(DeviceClass::Pressure),
        requirement: CapabilityRequirement::ApiGen2,
    },
    SensorDescriptor {
        key: "tire_pressure_fr",
        name: "Tire pressure FR",
        field: fields::TIRE_PRESSURE_FR,
        raw_unit: RawUnit::Hectopascals,
        device_class: Some(DeviceClass::Pressure),
        requirement: CapabilityRequirement::ApiGen2,
    },
    SensorDescriptor {
        key: "tire_pressure_rl",
        name: "Tire pressure RL",
        field: fields::TIRE_PRESSURE_RL,
        raw_unit: RawUnit::Hectopascals,
        device_class: Some(DeviceClass::Pressure),
        requirement: CapabilityRequirement::ApiGen2,
    },
    SensorDescriptor {
        key: "tire_pressure_rr",
        name: "Tire pressure RR",
        field: fields::TIRE_PRESSURE_RR,
        raw_unit: RawUnit::Hectopascals,
        device_class: Some(DeviceClass::Pressure),
        requirement: CapabilityRequirement::ApiGen2,
    },
];

/// Sensors available on EVs
pub const EV_SENSORS: &[SensorDescriptor] = &[
    SensorDescriptor {
        key: "ev_battery_level",
        name: "EV battery level",
        field: fields::EV_CHARGE_PERCENT,
        raw_unit: RawUnit::Percent,
        device_class: Some(DeviceClass::Battery),
        requirement: CapabilityRequirement::Ev,
    },
    SensorDescriptor {
        key: "ev_range",
        name: "EV range",
        field: fields::EV_DISTANCE_TO_EMPTY,
        raw_unit: RawUnit::Miles,
        device_class: Some(DeviceClass::Distance),
        requirement: CapabilityRequirement::Ev,
    },
    SensorDescriptor {
        key: "ev_time_to_full_charge",
        name: "EV time to full charge",
        field: fields::EV_TIME_TO_FULLY_CHARGED,
        raw_unit: RawUnit::Minutes,
        device_class: Some(DeviceClass::Duration),
        requirement: CapabilityRequirement::Ev,
    },
];

/// Every sensor in the catalog
pub fn all_sensors() -> impl Iterator<Item = &'static SensorDescriptor> {
    SAFETY_SENSORS
        .iter()
        .chain(API_GEN_2_SENSORS)
        .chain(EV_SENSORS)
}

/// Descriptors applicable to one vehicle's capability set
///
/// Entities must only be created for descriptors returned here.
pub fn applicable_sensors(vehicle: &VehicleInfo) -> Vec<&'static SensorDescriptor> {
    all_sensors()
        .filter(|descriptor| descriptor.requirement.matches(vehicle))
        .collect()
}
