//! Sensor descriptor catalog
//!
//! A static table of every sensor the integration can expose, gated by
//! vehicle capability. Descriptor keys are a stable public contract:
//! persisted unique IDs reference them, so adding a sensor means adding
//! a descriptor, never changing an existing key.

mod descriptor;
mod reading;

pub use descriptor::{
    all_sensors, applicable_sensors, CapabilityRequirement, DeviceClass, SensorDescriptor,
    API_GEN_2_SENSORS, EV_SENSORS, SAFETY_SENSORS,
};
pub use reading::{reading, SensorReading};
