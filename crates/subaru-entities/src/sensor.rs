//! Per-vehicle sensor entity adapters

use std::sync::Arc;

use subaru_coordinator::VehicleDataCoordinator;
use subaru_core::{slugify, DeviceInfo, MeasurementSystem, VehicleInfo};
use subaru_migration::UniqueIdRename;
use subaru_sensors::{applicable_sensors, reading, SensorDescriptor, SensorReading};

/// One vehicle sensor as seen by the host platform
///
/// Thin binding of a descriptor to the coordinator's cache; all values
/// are read from the last-known-good payload at access time.
pub struct SubaruSensor {
    coordinator: Arc<VehicleDataCoordinator>,
    vehicle: VehicleInfo,
    descriptor: &'static SensorDescriptor,
    system: MeasurementSystem,
}

impl SubaruSensor {
    pub fn new(
        coordinator: Arc<VehicleDataCoordinator>,
        vehicle: VehicleInfo,
        descriptor: &'static SensorDescriptor,
        system: MeasurementSystem,
    ) -> Self {
        Self {
            coordinator,
            vehicle,
            descriptor,
            system,
        }
    }

    /// Stable persisted unique ID: `{vin}_{sensor key}`
    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.vehicle.vin, self.descriptor.key)
    }

    /// Display name: `{car name} {sensor name}`
    pub fn name(&self) -> String {
        format!("{} {}", self.vehicle.name, self.descriptor.name)
    }

    /// Entity ID the host derives from the display name
    pub fn suggested_entity_id(&self) -> String {
        format!("sensor.{}", slugify(&self.name()))
    }

    /// Device identity for the host's device registry
    pub fn device_info(&self) -> DeviceInfo {
        self.vehicle.device_info()
    }

    /// The descriptor this sensor was created from
    pub fn descriptor(&self) -> &'static SensorDescriptor {
        self.descriptor
    }

    /// Current reading from the coordinator's cache
    pub fn reading(&self) -> SensorReading {
        let status = self.coordinator.status(&self.vehicle.vin);
        reading(self.descriptor, status.as_deref(), self.system)
    }

    /// Availability as exposed to the host
    pub fn available(&self) -> bool {
        self.coordinator.is_available(&self.vehicle.vin)
    }
}

/// Build sensors for every descriptor applicable to the vehicle
///
/// Descriptors outside the vehicle's capability set get no entity.
pub fn sensors_for_vehicle(
    coordinator: &Arc<VehicleDataCoordinator>,
    vehicle: &VehicleInfo,
    system: MeasurementSystem,
) -> Vec<SubaruSensor> {
    applicable_sensors(vehicle)
        .into_iter()
        .map(|descriptor| {
            SubaruSensor::new(
                Arc::clone(coordinator),
                vehicle.clone(),
                descriptor,
                system,
            )
        })
        .collect()
}

/// Legacy-to-current unique-ID renames for one vehicle's sensors
///
/// The legacy scheme suffixed the display name; the current scheme
/// suffixes the stable key.
pub fn unique_id_renames(vehicle: &VehicleInfo) -> Vec<UniqueIdRename> {
    applicable_sensors(vehicle)
        .into_iter()
        .map(|descriptor| UniqueIdRename {
            from: format!("{}_{}", vehicle.vin, descriptor.name),
            to: format!("{}_{}", vehicle.vin, descriptor.key),
        })
        .collect()
}
