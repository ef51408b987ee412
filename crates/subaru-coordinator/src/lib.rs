//! Fetch/Cache Coordinator
//!
//! Owns the periodic refresh loop for one config entry: fetches raw
//! vehicle data from the API client, caches last-known-good payloads per
//! VIN, tracks failure streaks, and exposes availability to entities.
//!
//! Two upstream operations are distinguished: `fetch` asks the vehicle
//! to push a fresh telemetry report (slow, rate-limited, only issued
//! once the report is older than the configured threshold), while
//! `get_data` reads whatever the upstream API already has (issued every
//! cycle). Refresh failures never propagate out of the cycle; they
//! degrade to stale-or-unavailable state and a log line.

mod state;

pub use state::{InvalidTransition, RefreshState};

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use subaru_client::VehicleClient;
use subaru_core::{IntegrationOptions, VehicleInfo, VehicleStatus, Vin};

/// Coordinator timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Interval between refresh cycles (get_data)
    pub poll_interval: Duration,
    /// Age after which a cycle also asks the vehicle for a fresh report
    /// (fetch)
    pub vehicle_report_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::from(&IntegrationOptions::default())
    }
}

impl From<&IntegrationOptions> for CoordinatorConfig {
    fn from(options: &IntegrationOptions) -> Self {
        Self {
            poll_interval: options.poll_interval(),
            vehicle_report_interval: options.vehicle_report_interval(),
        }
    }
}

/// Cached refresh state for one VIN
///
/// Replaced wholesale on every cycle; concurrent readers observe either
/// the previous entry or the new one, never a partial update.
#[derive(Debug, Clone, Default)]
struct VehicleCache {
    /// Last-known-good payload, retained across failed cycles
    status: Option<Arc<VehicleStatus>>,
    /// When the payload was last replaced
    last_success: Option<DateTime<Utc>>,
    /// When the vehicle last accepted a report request
    last_vehicle_report: Option<DateTime<Utc>>,
    /// Consecutive cycles without fresh data for this VIN
    failure_streak: u32,
}

/// Per-config-entry refresh coordinator
///
/// One instance is created per config entry, shared with entities via
/// `Arc`, and driven by a single spawned refresh task. Entity reads and
/// command dispatches run concurrently against the cache; commands are
/// never queued behind a refresh cycle.
pub struct VehicleDataCoordinator {
    client: Arc<dyn VehicleClient>,
    vehicles: Vec<VehicleInfo>,
    config: CoordinatorConfig,

    /// Per-VIN cache; entries are swapped whole
    cache: DashMap<Vin, VehicleCache>,
    /// Refresh-cycle state machine
    state: RwLock<RefreshState>,

    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl VehicleDataCoordinator {
    /// Create a coordinator for one config entry's vehicles
    pub fn new(
        client: Arc<dyn VehicleClient>,
        vehicles: Vec<VehicleInfo>,
        config: CoordinatorConfig,
    ) -> Self {
        let cache = DashMap::new();
        for vehicle in &vehicles {
            cache.insert(vehicle.vin.clone(), VehicleCache::default());
        }

        let (shutdown_tx, _) = watch::channel(false);

        Self {
            client,
            vehicles,
            config,
            cache,
            state: RwLock::new(RefreshState::Idle),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    /// Vehicles covered by this config entry
    pub fn vehicles(&self) -> &[VehicleInfo] {
        &self.vehicles
    }

    /// Current refresh-cycle state
    pub fn state(&self) -> RefreshState {
        self.state.read().map(|s| *s).unwrap_or_default()
    }

    /// Last-known-good payload for a VIN
    pub fn status(&self, vin: &Vin) -> Option<Arc<VehicleStatus>> {
        self.cache.get(vin).and_then(|entry| entry.status.clone())
    }

    /// Whether any payload is cached for a VIN
    pub fn is_available(&self, vin: &Vin) -> bool {
        self.cache
            .get(vin)
            .map(|entry| entry.status.is_some())
            .unwrap_or(false)
    }

    /// When a VIN's payload was last replaced
    pub fn last_updated(&self, vin: &Vin) -> Option<DateTime<Utc>> {
        self.cache.get(vin).and_then(|entry| entry.last_success)
    }

    /// Consecutive cycles without fresh data for a VIN
    pub fn failure_streak(&self, vin: &Vin) -> u32 {
        self.cache
            .get(vin)
            .map(|entry| entry.failure_streak)
            .unwrap_or(0)
    }

    /// Start the periodic refresh task
    ///
    /// The first cycle runs immediately. Starting an already-started
    /// coordinator is a no-op.
    pub fn start(self: &Arc<Self>) {
        let Ok(mut task) = self.task.lock() else {
            return;
        };
        if task.is_some() {
            warn!("Refresh task already running");
            return;
        }

        let this = Arc::clone(self);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(this.config.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        this.refresh_all().await;
                    }
                    _ = shutdown_rx.changed() => {
                        info!("Stopping vehicle refresh loop");
                        break;
                    }
                }
            }
        }));

        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            vehicles = self.vehicles.len(),
            "Started vehicle refresh loop"
        );
    }

    /// Run one refresh cycle outside the schedule
    pub async fn refresh_now(&self) {
        self.refresh_all().await;
    }

    /// Stop the refresh task and wait for an in-flight cycle to finish
    ///
    /// Teardown never leaves the entry stuck in `Fetching`.
    pub async fn shutdown(&self) {
        let task = self.task.lock().ok().and_then(|mut guard| guard.take());
        if let Some(task) = task {
            let _ = self.shutdown_tx.send(true);
            let _ = task.await;
        }

        if self.state() == RefreshState::Fetching {
            self.transition(RefreshState::Idle);
        }
    }

    async fn refresh_all(&self) {
        if !self.transition(RefreshState::Fetching) {
            debug!("Refresh already in progress, skipping cycle");
            return;
        }

        let results = join_all(
            self.vehicles
                .iter()
                .map(|vehicle| self.refresh_vehicle(vehicle)),
        )
        .await;

        let outcome = if results.iter().all(|fresh| *fresh) {
            RefreshState::Updated
        } else {
            RefreshState::Failed
        };
        self.transition(outcome);
    }

    /// Refresh one vehicle; returns true when fresh data was cached
    async fn refresh_vehicle(&self, vehicle: &VehicleInfo) -> bool {
        let vin = &vehicle.vin;
        let previous = self
            .cache
            .get(vin)
            .map(|entry| entry.clone())
            .unwrap_or_default();

        let mut last_vehicle_report = previous.last_vehicle_report;
        if vehicle.has_remote_service
            && should_request_report(
                last_vehicle_report,
                Utc::now(),
                self.config.vehicle_report_interval,
            )
        {
            match self.client.fetch(vin).await {
                Ok(()) => last_vehicle_report = Some(Utc::now()),
                Err(err) => warn!(vin = %vin, error = %err, "Vehicle report request failed"),
            }
        }

        match self.client.get_data(vin).await {
            Ok(Some(status)) if !status.is_empty() => {
                self.cache.insert(
                    vin.clone(),
                    VehicleCache {
                        status: Some(Arc::new(status)),
                        last_success: Some(Utc::now()),
                        last_vehicle_report,
                        failure_streak: 0,
                    },
                );
                debug!(vin = %vin, "Vehicle data refreshed");
                true
            }
            Ok(_) => {
                warn!(
                    vin = %vin,
                    streak = previous.failure_streak + 1,
                    "No data received for vehicle, keeping previous payload"
                );
                self.retain_previous(vin, previous, last_vehicle_report);
                false
            }
            Err(err) => {
                warn!(
                    vin = %vin,
                    error = %err,
                    streak = previous.failure_streak + 1,
                    "Vehicle data refresh failed, keeping previous payload"
                );
                self.retain_previous(vin, previous, last_vehicle_report);
                false
            }
        }
    }

    /// Stale-but-available: keep the old payload, bump the streak
    fn retain_previous(
        &self,
        vin: &Vin,
        previous: VehicleCache,
        last_vehicle_report: Option<DateTime<Utc>>,
    ) {
        self.cache.insert(
            vin.clone(),
            VehicleCache {
                failure_streak: previous.failure_streak + 1,
                last_vehicle_report,
                ..previous
            },
        );
    }

    fn transition(&self, to: RefreshState) -> bool {
        let Ok(mut state) = self.state.write() else {
            return false;
        };
        match state.try_transition(to) {
            Ok(next) => {
                *state = next;
                true
            }
            Err(err) => {
                debug!(%err, "Refresh state transition rejected");
                false
            }
        }
    }
}

/// Whether a cycle should ask the vehicle for a fresh report
///
/// True when no report was ever requested, or when the last one is at
/// least `interval` old. A last-report timestamp in the future (clock
/// adjustment) suppresses the request until the clock catches up.
fn should_request_report(
    last_report: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    interval: Duration,
) -> bool {
    match last_report {
        None => true,
        Some(at) => (now - at).to_std().map(|age| age >= interval).unwrap_or(false),
    }
}
