//! Lock and sensor entity adapters
//!
//! Thin per-vehicle objects binding the coordinator, the descriptor
//! catalog and the command dispatcher into the host's entity contract.
//! The core never depends on the host's class hierarchy; the host wraps
//! these adapters in whatever entity base it uses.

mod lock;
mod sensor;

pub use lock::{locks_for_vehicles, SubaruLock};
pub use sensor::{sensors_for_vehicle, unique_id_renames, SubaruSensor};

use std::sync::Arc;

use tracing::info;

use subaru_client::VehicleClient;
use subaru_coordinator::VehicleDataCoordinator;
use subaru_core::IntegrationOptions;
use subaru_migration::{migrate_unique_ids, MigrationOutcome, RegistryView};

/// Entities created for one config entry
pub struct EntryEntities {
    pub sensors: Vec<SubaruSensor>,
    pub locks: Vec<SubaruLock>,
}

/// Assemble the entities for one config entry
///
/// Runs the unique-ID migration against the host registry view first,
/// then builds sensors for each vehicle's applicable descriptors and
/// locks for each vehicle with remote service. The host adds the
/// returned adapters to its platforms and writes the migrated registry
/// view back.
pub fn setup_entry(
    client: Arc<dyn VehicleClient>,
    coordinator: Arc<VehicleDataCoordinator>,
    registry: &mut RegistryView,
    options: &IntegrationOptions,
) -> (EntryEntities, Vec<MigrationOutcome>) {
    let mut renames = Vec::new();
    for vehicle in coordinator.vehicles() {
        renames.extend(unique_id_renames(vehicle));
    }
    let outcomes = migrate_unique_ids(registry, &renames);

    let mut sensors = Vec::new();
    for vehicle in coordinator.vehicles() {
        sensors.extend(sensors_for_vehicle(
            &coordinator,
            vehicle,
            options.measurement_system,
        ));
    }
    let locks = locks_for_vehicles(&client, coordinator.vehicles(), options.notification);

    info!(
        vehicles = coordinator.vehicles().len(),
        sensors = sensors.len(),
        locks = locks.len(),
        migrated = outcomes.len(),
        "Set up entry entities"
    );

    (EntryEntities { sensors, locks }, outcomes)
}
