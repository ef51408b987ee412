//! API-client boundary
//!
//! The remote API client (authentication, transport, vehicle
//! enumeration) is an external collaborator. This crate pins down the
//! exact surface the engine consumes from it: ask a vehicle to push
//! fresh telemetry, read the currently cached report, and issue remote
//! lock/unlock commands.
//!
//! Remote commands may take an extended time to round-trip through the
//! vehicle; callers get whatever timeout behavior the client implements,
//! nothing is layered on top here.

use async_trait::async_trait;
use thiserror::Error;

use subaru_core::{NotificationPreference, VehicleStatus, Vin};

/// Errors raised by the API client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication expired")]
    AuthExpired,

    #[error("command timed out")]
    Timeout,

    #[error("vehicle did not respond")]
    VehicleUnreachable,

    #[error("remote service failure: {0}")]
    RemoteService(String),
}

/// Result alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Door selector in the client's command vocabulary
///
/// Service-level door names are validated and translated into this
/// vocabulary before a command reaches the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCommand {
    /// All doors
    AllDoors,
    /// Driver's door only
    DriverDoor,
}

/// Operations the engine consumes from the remote API client
///
/// All operations are async and may fail with a transport or auth error;
/// none of them block the caller beyond the network round-trip.
#[async_trait]
pub trait VehicleClient: Send + Sync {
    /// Ask the vehicle to push a fresh telemetry report
    ///
    /// Slow and rate-limited upstream; success means the request was
    /// accepted, not that new data is already readable.
    async fn fetch(&self, vin: &Vin) -> ClientResult<()>;

    /// Read the telemetry report currently cached by the upstream API
    ///
    /// Returns None when the upstream has no report for this vehicle.
    async fn get_data(&self, vin: &Vin) -> ClientResult<Option<VehicleStatus>>;

    /// Lock all doors
    async fn lock(&self, vin: &Vin, notification: NotificationPreference) -> ClientResult<()>;

    /// Unlock the selected door(s)
    async fn unlock(
        &self,
        vin: &Vin,
        door: DoorCommand,
        notification: NotificationPreference,
    ) -> ClientResult<()>;
}
