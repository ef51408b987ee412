//! Per-vehicle door-lock entity adapters
//!
//! The upstream API does not report lock status, so the lock state
//! exposed to the host is always unknown; only the commands are real.

use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use subaru_client::VehicleClient;
use subaru_core::{DeviceInfo, NotificationPreference, VehicleInfo};
use subaru_remote::{dispatch, CommandError, Door, RemoteAction};

/// One vehicle's door locks as seen by the host platform
pub struct SubaruLock {
    client: Arc<dyn VehicleClient>,
    vehicle: VehicleInfo,
    notification: NotificationPreference,
}

impl SubaruLock {
    pub fn new(
        client: Arc<dyn VehicleClient>,
        vehicle: VehicleInfo,
        notification: NotificationPreference,
    ) -> Self {
        Self {
            client,
            vehicle,
            notification,
        }
    }

    /// Stable persisted unique ID: `{vin}_door_locks`
    pub fn unique_id(&self) -> String {
        format!("{}_door_locks", self.vehicle.vin)
    }

    /// Display name: `{car name} Door Locks`
    pub fn name(&self) -> String {
        format!("{} Door Locks", self.vehicle.name)
    }

    /// Device identity for the host's device registry
    pub fn device_info(&self) -> DeviceInfo {
        self.vehicle.device_info()
    }

    /// Lock state; always unknown by API limitation
    pub fn is_locked(&self) -> Option<bool> {
        None
    }

    /// Send the lock command
    pub async fn lock(&self) -> Result<(), CommandError> {
        dispatch(
            self.client.as_ref(),
            &self.vehicle,
            RemoteAction::Lock,
            self.notification,
        )
        .await
    }

    /// Send the unlock command for all doors
    pub async fn unlock(&self) -> Result<(), CommandError> {
        dispatch(
            self.client.as_ref(),
            &self.vehicle,
            RemoteAction::Unlock,
            self.notification,
        )
        .await
    }

    /// Send the unlock command for one door named in the service
    /// vocabulary
    ///
    /// The door name is validated here, before any client call.
    pub async fn unlock_specific_door(&self, door: &str) -> Result<(), CommandError> {
        let door = Door::from_str(door)?;
        debug!(car = %self.vehicle.name, door = %door, "Unlock requested via service");
        dispatch(
            self.client.as_ref(),
            &self.vehicle,
            RemoteAction::UnlockDoor(door),
            self.notification,
        )
        .await
    }
}

/// Build locks for every vehicle that accepts remote commands
pub fn locks_for_vehicles(
    client: &Arc<dyn VehicleClient>,
    vehicles: &[VehicleInfo],
    notification: NotificationPreference,
) -> Vec<SubaruLock> {
    vehicles
        .iter()
        .filter(|vehicle| vehicle.has_remote_service)
        .map(|vehicle| SubaruLock::new(Arc::clone(client), vehicle.clone(), notification))
        .collect()
}
