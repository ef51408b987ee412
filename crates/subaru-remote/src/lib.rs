//! Remote command dispatch
//!
//! Translates a requested lock/unlock action plus the configured
//! notification preference into one asynchronous call against the API
//! client. Door names arriving from the service boundary are validated
//! here, before any network call. Dispatch is at-most-once: no retries,
//! no additional timeout beyond the client's own, and client failures
//! propagate to the caller as a typed error.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use subaru_client::{ClientError, DoorCommand, VehicleClient};
use subaru_core::{NotificationPreference, VehicleInfo};

/// Door names accepted by the unlock-specific-door service
pub const VALID_DOORS: &[&str] = &["driver", "all"];

/// Errors surfaced to the user for a failed remote command
#[derive(Debug, Error)]
pub enum CommandError {
    /// Rejected at the service boundary, before any client call
    #[error("invalid door '{0}' (valid doors: driver, all)")]
    InvalidDoor(String),

    /// The client reported the command failed
    #[error("remote command failed: {0}")]
    Client(#[from] ClientError),
}

/// Door selector in the service vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Door {
    /// Driver's door only
    Driver,
    /// All doors
    All,
}

impl Door {
    /// Service-vocabulary name for this door
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::All => "all",
        }
    }

    /// Translate to the client's command vocabulary
    pub fn command(&self) -> DoorCommand {
        match self {
            Self::Driver => DoorCommand::DriverDoor,
            Self::All => DoorCommand::AllDoors,
        }
    }
}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Door {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(Self::Driver),
            "all" => Ok(Self::All),
            other => Err(CommandError::InvalidDoor(other.to_string())),
        }
    }
}

/// A remote action requested through the host entity contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    /// Lock all doors
    Lock,
    /// Unlock all doors
    Unlock,
    /// Unlock a specific door
    UnlockDoor(Door),
}

/// Issue one remote command against the API client
///
/// The notification preference is passed through unchanged; honoring it
/// is the client's responsibility. The call may take as long as a remote
/// vehicle round-trip takes.
pub async fn dispatch(
    client: &dyn VehicleClient,
    vehicle: &VehicleInfo,
    action: RemoteAction,
    notification: NotificationPreference,
) -> Result<(), CommandError> {
    let vin = &vehicle.vin;

    match action {
        RemoteAction::Lock => {
            debug!(car = %vehicle.name, "Locking doors");
            client.lock(vin, notification).await?;
        }
        RemoteAction::Unlock => {
            debug!(car = %vehicle.name, "Unlocking doors");
            client.unlock(vin, Door::All.command(), notification).await?;
        }
        RemoteAction::UnlockDoor(door) => {
            debug!(car = %vehicle.name, door = %door, "Unlocking door");
            client.unlock(vin, door.command(), notification).await?;
        }
    }

    Ok(())
}
