//! Fixed-cadence polling scheduler.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use super::{SyncOutcome, SyncState, Synchronize};
use crate::error::SyncError;

/// Handle for controlling a running poll scheduler.
pub struct PollHandle {
    /// Sender to signal shutdown.
    shutdown_tx: watch::Sender<bool>,
}

impl PollHandle {
    /// Signals the scheduler to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drives a [`Synchronize`] implementation at a fixed wall-clock cadence.
///
/// The first cycle runs one full interval after [`PollScheduler::start`],
/// and at most one cycle runs per interval window. Cycles never overlap
/// because the loop awaits each cycle before ticking again. Errors from
/// a cycle are recorded and logged; the loop continues unconditionally.
pub struct PollScheduler<S: Synchronize + ?Sized> {
    /// The synchronizer to drive.
    synchronizer: Arc<S>,
    /// Shared cycle-state tracker.
    state: Arc<SyncState>,
    /// Interval between cycles.
    interval: Duration,
}

impl<S: Synchronize + ?Sized + 'static> PollScheduler<S> {
    /// Creates a new poll scheduler.
    pub fn new(synchronizer: Arc<S>, state: Arc<SyncState>, interval: Duration) -> Self {
        Self {
            synchronizer,
            state,
            interval,
        }
    }

    /// Starts the polling loop.
    ///
    /// Returns a handle that can be used to stop the scheduler; dropping
    /// the handle stops it as well.
    pub fn start(self) -> PollHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = PollHandle { shutdown_tx };

        tokio::spawn(self.run(shutdown_rx));

        handle
    }

    /// Runs the polling loop until the shutdown signal fires.
    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("starting poll scheduler with interval {:?}", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.do_cycle().await;
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!("poll scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Performs a single synchronization cycle.
    async fn do_cycle(&self) {
        info!("checking for updates");

        match self.synchronizer.synchronize().await {
            Ok(outcome) => {
                match &outcome {
                    SyncOutcome::UpToDate => debug!("{}", outcome),
                    SyncOutcome::FastForwarded { .. } | SyncOutcome::Merged { .. } => {
                        info!("{}", outcome)
                    },
                }
                self.state.record_success(outcome);
            },
            Err(e) => {
                self.state.record_failure(e.to_string());
                warn!("synchronization cycle failed: {}", e);
            },
        }
    }

    /// Runs one cycle immediately, outside the fixed cadence.
    pub async fn run_once(&self) -> Result<SyncOutcome, SyncError> {
        info!("manual cycle triggered");
        let result = self.synchronizer.synchronize().await;

        match &result {
            Ok(outcome) => self.state.record_success(outcome.clone()),
            Err(e) => self.state.record_failure(e.to_string()),
        }

        result
    }
}
