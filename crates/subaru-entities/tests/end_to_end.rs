//! End-to-end tests for one config entry: refresh, read, command,
//! migrate

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use subaru_client::{ClientResult, DoorCommand, VehicleClient};
use subaru_coordinator::{CoordinatorConfig, VehicleDataCoordinator};
use subaru_core::{
    fields, ApiGeneration, IntegrationOptions, MeasurementSystem, NotificationPreference,
    VehicleInfo, VehicleStatus, Vin,
};
use subaru_entities::{setup_entry, SubaruSensor};
use subaru_migration::{MigrationOutcome, RegistryEntry, RegistryView};

const TEST_VIN: &str = "JF2ABCDE6L0000002";

/// Scripted client: pops get_data responses in order, then repeats the
/// last scripted payload; records remote commands
struct ScriptedClient {
    responses: Mutex<VecDeque<Option<VehicleStatus>>>,
    unlocks: Mutex<Vec<DoorCommand>>,
}

impl ScriptedClient {
    fn new(responses: Vec<Option<VehicleStatus>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            unlocks: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl VehicleClient for ScriptedClient {
    async fn fetch(&self, _vin: &Vin) -> ClientResult<()> {
        Ok(())
    }

    async fn get_data(&self, _vin: &Vin) -> ClientResult<Option<VehicleStatus>> {
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            Ok(responses.pop_front().unwrap())
        } else {
            Ok(responses.front().cloned().flatten())
        }
    }

    async fn lock(&self, _vin: &Vin, _notification: NotificationPreference) -> ClientResult<()> {
        Ok(())
    }

    async fn unlock(
        &self,
        _vin: &Vin,
        door: DoorCommand,
        _notification: NotificationPreference,
    ) -> ClientResult<()> {
        self.unlocks.lock().unwrap().push(door);
        Ok(())
    }
}

fn ev_vehicle() -> VehicleInfo {
    VehicleInfo {
        vin: Vin::new(TEST_VIN).unwrap(),
        name: "Test Vehicle 2".to_string(),
        model_name: Some("Solterra".to_string()),
        model_year: Some("2023".to_string()),
        has_remote_service: true,
        is_ev: true,
        api_generation: ApiGeneration::G2,
        has_safety_plus: true,
    }
}

fn ev_status() -> VehicleStatus {
    VehicleStatus::default()
        .with(fields::ODOMETER, 12345)
        .with(fields::AVG_FUEL_CONSUMPTION, 2.3)
        .with(fields::DIST_TO_EMPTY, 707)
        .with(fields::EXTERNAL_TEMP, -5.0)
        .with(fields::EV_CHARGE_PERCENT, 20)
        .with(fields::EV_DISTANCE_TO_EMPTY, 1)
        .with(fields::EV_TIME_TO_FULLY_CHARGED, 120)
        .with(fields::TIRE_PRESSURE_FL, 2550)
        .with(fields::TIRE_PRESSURE_FR, 2550)
        .with(fields::TIRE_PRESSURE_RL, 2450)
        .with(fields::TIRE_PRESSURE_RR, 2450)
}

fn imperial_options() -> IntegrationOptions {
    IntegrationOptions {
        measurement_system: MeasurementSystem::Imperial,
        ..IntegrationOptions::default()
    }
}

fn sensor_by_key<'a>(sensors: &'a [SubaruSensor], key: &str) -> &'a SubaruSensor {
    sensors
        .iter()
        .find(|s| s.descriptor().key == key)
        .unwrap_or_else(|| panic!("no sensor with key {key}"))
}

fn entry(
    responses: Vec<Option<VehicleStatus>>,
    options: &IntegrationOptions,
) -> (
    Arc<ScriptedClient>,
    Arc<VehicleDataCoordinator>,
    subaru_entities::EntryEntities,
) {
    let client = ScriptedClient::new(responses);
    let coordinator = Arc::new(VehicleDataCoordinator::new(
        client.clone(),
        vec![ev_vehicle()],
        CoordinatorConfig::from(options),
    ));
    let mut registry = RegistryView::default();
    let (entities, _) = setup_entry(client.clone(), coordinator.clone(), &mut registry, options);
    (client, coordinator, entities)
}

#[tokio::test]
async fn test_sensors_ev_imperial() {
    let options = imperial_options();
    let (_client, coordinator, entities) = entry(vec![Some(ev_status())], &options);

    coordinator.refresh_now().await;

    let odometer = sensor_by_key(&entities.sensors, "odometer");
    assert_eq!(
        odometer.suggested_entity_id(),
        "sensor.test_vehicle_2_odometer"
    );
    let reading = odometer.reading();
    assert_eq!(reading.value, Some(7670.8));
    assert_eq!(reading.unit, "mi");
    assert!(reading.available);

    let temp = sensor_by_key(&entities.sensors, "external_temp").reading();
    assert_eq!(temp.value, Some(23.0));
    assert_eq!(temp.unit, "°F");

    let fuel = sensor_by_key(&entities.sensors, "average_fuel_consumption").reading();
    assert_eq!(fuel.value, Some(102.3));
    assert_eq!(fuel.unit, "mpg");

    let tire = sensor_by_key(&entities.sensors, "tire_pressure_fl").reading();
    assert_eq!(tire.value, Some(37.0));
    assert_eq!(tire.unit, "psi");

    let range = sensor_by_key(&entities.sensors, "ev_range").reading();
    assert_eq!(range.value, Some(1.0));
    assert_eq!(range.unit, "mi");
}

#[tokio::test]
async fn test_sensors_ev_metric() {
    let options = IntegrationOptions::default();
    let (_client, coordinator, entities) = entry(vec![Some(ev_status())], &options);

    coordinator.refresh_now().await;

    let odometer = sensor_by_key(&entities.sensors, "odometer").reading();
    assert_eq!(odometer.value, Some(12345.0));
    assert_eq!(odometer.unit, "km");

    let temp = sensor_by_key(&entities.sensors, "external_temp").reading();
    assert_eq!(temp.value, Some(-5.0));
    assert_eq!(temp.unit, "°C");

    // EV range is reported in miles and converted for metric installs
    let range = sensor_by_key(&entities.sensors, "ev_range").reading();
    assert_eq!(range.value, Some(1.6));
    assert_eq!(range.unit, "km");
}

#[tokio::test]
async fn test_sensors_missing_vin_data() {
    let options = IntegrationOptions::default();
    let (_client, coordinator, entities) =
        entry(vec![Some(ev_status()), None], &options);

    coordinator.refresh_now().await;
    coordinator.refresh_now().await;

    // Previous payload retained; sensors stay available and keep values
    let odometer = sensor_by_key(&entities.sensors, "odometer").reading();
    assert!(odometer.available);
    assert_eq!(odometer.value, Some(12345.0));
}

#[tokio::test]
async fn test_sensors_never_fetched_are_unavailable() {
    let options = IntegrationOptions::default();
    let (_client, _coordinator, entities) = entry(vec![None], &options);

    let odometer = sensor_by_key(&entities.sensors, "odometer").reading();
    assert!(!odometer.available);
    assert_eq!(odometer.value, None);
}

#[tokio::test]
async fn test_lock_service_round_trip() {
    let options = IntegrationOptions::default();
    let (client, _coordinator, entities) = entry(vec![Some(ev_status())], &options);

    let lock = &entities.locks[0];
    assert_eq!(lock.unique_id(), format!("{TEST_VIN}_door_locks"));
    assert_eq!(lock.is_locked(), None);

    lock.unlock_specific_door("driver").await.unwrap();
    assert_eq!(*client.unlocks.lock().unwrap(), vec![DoorCommand::DriverDoor]);

    let result = lock.unlock_specific_door("window").await;
    assert!(result.is_err());
    // The invalid door never produced a client call
    assert_eq!(client.unlocks.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_setup_migrates_legacy_unique_ids() {
    let options = IntegrationOptions::default();
    let client = ScriptedClient::new(vec![Some(ev_status())]);
    let coordinator = Arc::new(VehicleDataCoordinator::new(
        client.clone(),
        vec![ev_vehicle()],
        CoordinatorConfig::from(&options),
    ));
    let mut registry = RegistryView::new([RegistryEntry::new(
        "sensor.test_vehicle_2_odometer",
        "subaru",
        format!("{TEST_VIN}_Odometer"),
    )]);

    let (_, outcomes) = setup_entry(client, coordinator, &mut registry, &options);

    assert!(matches!(
        outcomes.as_slice(),
        [MigrationOutcome::Migrated { .. }]
    ));
    assert_eq!(
        registry.get("sensor.test_vehicle_2_odometer").unwrap().unique_id,
        format!("{TEST_VIN}_odometer")
    );
}

#[tokio::test]
async fn test_setup_migration_duplicate_is_reported_not_fatal() {
    let options = IntegrationOptions::default();
    let client = ScriptedClient::new(vec![Some(ev_status())]);
    let coordinator = Arc::new(VehicleDataCoordinator::new(
        client.clone(),
        vec![ev_vehicle()],
        CoordinatorConfig::from(&options),
    ));
    let mut registry = RegistryView::new([
        RegistryEntry::new(
            "sensor.test_vehicle_2_odometer",
            "subaru",
            format!("{TEST_VIN}_Odometer"),
        ),
        RegistryEntry::new(
            "sensor.test_vehicle_2_odometer_2",
            "subaru",
            format!("{TEST_VIN}_odometer"),
        ),
    ]);

    let (entities, outcomes) = setup_entry(client, coordinator, &mut registry, &options);

    assert!(matches!(
        outcomes.as_slice(),
        [MigrationOutcome::Collision { .. }]
    ));
    // Both entries keep their unique IDs, and setup still produced
    // entities
    assert_eq!(
        registry.get("sensor.test_vehicle_2_odometer").unwrap().unique_id,
        format!("{TEST_VIN}_Odometer")
    );
    assert!(!entities.sensors.is_empty());
}
