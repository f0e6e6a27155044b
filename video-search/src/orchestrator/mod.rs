//! Orchestrator module for the video search service.
//!
//! Drives periodic sync cycles: fetch every video from the content store,
//! then upsert them all into the search index.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

use crate::errors::IngestError;
use crate::loader::SearchLoader;
use crate::source::SourceFetcher;
use video_search_repository::UpsertStats;

/// Default time between the start of two sync cycles.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Time between ticks of the sync timer.
    pub sync_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            sync_interval: DEFAULT_SYNC_INTERVAL,
        }
    }
}

/// Where the current sync cycle is.
///
/// `Failed` is transient: a failed cycle always returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Fetching,
    Upserting,
    Failed,
}

/// Result of one successful sync cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Number of records returned by the content store.
    pub fetched: usize,
    /// Result of the bulk upsert.
    pub stats: UpsertStats,
    /// Wall-clock duration of the cycle.
    pub duration: Duration,
}

/// Running totals since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorStats {
    pub completed_cycles: u64,
    pub failed_cycles: u64,
    pub skipped_ticks: u64,
    pub records_indexed: u64,
}

/// State shared between the scheduler loop and the cycle task it spawns.
struct SyncCycle {
    fetcher: Arc<dyn SourceFetcher>,
    loader: SearchLoader,
    index_ready: AtomicBool,
    in_flight: AtomicBool,
    phase: watch::Sender<CyclePhase>,
    cycle_seq: AtomicU64,
    completed_cycles: AtomicU64,
    failed_cycles: AtomicU64,
    skipped_ticks: AtomicU64,
    records_indexed: AtomicU64,
}

/// Clears the in-flight flag when the cycle task ends, even if it panics.
struct InFlightGuard(Arc<SyncCycle>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}

impl SyncCycle {
    fn try_begin(self: &Arc<Self>) -> Option<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(Arc::clone(self)))
    }

    fn set_phase(&self, phase: CyclePhase) {
        self.phase.send_replace(phase);
    }

    /// One fetch-then-upsert pass. Fetch strictly precedes upsert.
    async fn run(&self) -> Result<CycleOutcome, IngestError> {
        let started = Instant::now();

        if !self.index_ready.load(Ordering::Acquire) {
            self.loader.ensure_index().await?;
            self.index_ready.store(true, Ordering::Release);
        }

        self.set_phase(CyclePhase::Fetching);
        let records = self.fetcher.fetch_all().await?;

        self.set_phase(CyclePhase::Upserting);
        let stats = self.loader.upsert(&records).await?;

        Ok(CycleOutcome {
            fetched: records.len(),
            stats,
            duration: started.elapsed(),
        })
    }

    #[instrument(skip(self))]
    async fn run_and_record(&self, cycle: u64) {
        info!("Starting sync cycle");

        match self.run().await {
            Ok(outcome) => {
                self.completed_cycles.fetch_add(1, Ordering::Relaxed);
                self.records_indexed
                    .fetch_add(outcome.stats.written as u64, Ordering::Relaxed);
                info!(
                    fetched = outcome.fetched,
                    written = outcome.stats.written,
                    failed = outcome.stats.errors.len(),
                    duration_ms = outcome.duration.as_millis() as u64,
                    "Sync cycle completed"
                );
            }
            Err(e) => {
                self.set_phase(CyclePhase::Failed);
                self.failed_cycles.fetch_add(1, Ordering::Relaxed);
                error!(stage = e.stage(), error = %e, "Sync cycle failed");
            }
        }

        self.set_phase(CyclePhase::Idle);
    }
}

/// Orchestrator that schedules sync cycles.
///
/// The orchestrator:
/// - Starts one cycle immediately, then one per tick of the sync timer
/// - Skips a tick while the previous cycle is still running
/// - Keeps running when a cycle fails; the next tick retries from scratch
/// - On shutdown, lets the in-flight cycle finish before returning
///
/// The timer is tokio's, so tests can pause and advance virtual time.
pub struct Orchestrator {
    cycle: Arc<SyncCycle>,
    config: OrchestratorConfig,
    shutdown_tx: watch::Sender<bool>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(fetcher: Arc<dyn SourceFetcher>, loader: SearchLoader) -> Self {
        Self::with_config(fetcher, loader, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        fetcher: Arc<dyn SourceFetcher>,
        loader: SearchLoader,
        config: OrchestratorConfig,
    ) -> Self {
        let (phase, _) = watch::channel(CyclePhase::Idle);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            cycle: Arc::new(SyncCycle {
                fetcher,
                loader,
                index_ready: AtomicBool::new(true),
                in_flight: AtomicBool::new(false),
                phase,
                cycle_seq: AtomicU64::new(0),
                completed_cycles: AtomicU64::new(0),
                failed_cycles: AtomicU64::new(0),
                skipped_ticks: AtomicU64::new(0),
                records_indexed: AtomicU64::new(0),
            }),
            config,
            shutdown_tx,
        }
    }

    /// Require every cycle to ensure the index exists until that first succeeds.
    ///
    /// Used when startup could not confirm the index.
    pub fn require_index_check(self) -> Self {
        self.cycle.index_ready.store(false, Ordering::Release);
        self
    }

    /// Whether the index has been confirmed to exist.
    pub fn is_index_ready(&self) -> bool {
        self.cycle.index_ready.load(Ordering::Acquire)
    }

    /// Watch the phase of the current cycle.
    pub fn subscribe_phase(&self) -> watch::Receiver<CyclePhase> {
        self.cycle.phase.subscribe()
    }

    /// Snapshot of the running totals.
    pub fn stats(&self) -> OrchestratorStats {
        OrchestratorStats {
            completed_cycles: self.cycle.completed_cycles.load(Ordering::Relaxed),
            failed_cycles: self.cycle.failed_cycles.load(Ordering::Relaxed),
            skipped_ticks: self.cycle.skipped_ticks.load(Ordering::Relaxed),
            records_indexed: self.cycle.records_indexed.load(Ordering::Relaxed),
        }
    }

    /// Run the scheduler until `shutdown` is called.
    #[instrument(skip(self), fields(sync_interval_secs = self.config.sync_interval.as_secs()))]
    pub async fn run(&self) {
        info!("Starting sync scheduler");

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        // The first tick completes immediately, which gives the startup cycle.
        let mut ticker = interval(self.config.sync_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut current: Option<JoinHandle<()>> = None;

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    if let Some(handle) = self.on_tick() {
                        current = Some(handle);
                    }
                }
            }
        }

        if let Some(handle) = current {
            if !handle.is_finished() {
                info!("Waiting for in-flight sync cycle to finish");
            }
            if let Err(e) = handle.await {
                error!(error = %e, "Sync cycle task panicked");
            }
        }

        let stats = self.stats();
        info!(
            completed_cycles = stats.completed_cycles,
            failed_cycles = stats.failed_cycles,
            skipped_ticks = stats.skipped_ticks,
            records_indexed = stats.records_indexed,
            "Sync scheduler stopped"
        );
    }

    /// Start a cycle unless one is already running.
    fn on_tick(&self) -> Option<JoinHandle<()>> {
        let Some(guard) = self.cycle.try_begin() else {
            self.cycle.skipped_ticks.fetch_add(1, Ordering::Relaxed);
            warn!("Previous sync cycle still running, skipping tick");
            return None;
        };

        let cycle = Arc::clone(&self.cycle);
        let seq = cycle.cycle_seq.fetch_add(1, Ordering::Relaxed) + 1;
        Some(tokio::spawn(async move {
            let _guard = guard;
            cycle.run_and_record(seq).await;
        }))
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}
