//! Synchronization cycle state tracking.

use std::time::Instant;

use parking_lot::RwLock;

use super::SyncOutcome;

/// Tracks the result of the most recent synchronization cycles.
///
/// The synchronizer itself is stateless across cycles; this tracker
/// exists for reporting and health checks only.
#[derive(Debug)]
pub struct SyncState {
    /// Outcome of the last successful cycle.
    last_outcome: RwLock<Option<SyncOutcome>>,
    /// SHA HEAD was last observed at.
    commit: RwLock<Option<String>>,
    /// Completion time of the last successful cycle.
    last_cycle: RwLock<Option<Instant>>,
    /// The last error message, if any.
    last_error: RwLock<Option<String>>,
    /// Number of consecutive failed cycles.
    failure_count: RwLock<u32>,
}

impl SyncState {
    /// Creates a new SyncState.
    pub fn new() -> Self {
        Self {
            last_outcome: RwLock::new(None),
            commit: RwLock::new(None),
            last_cycle: RwLock::new(None),
            last_error: RwLock::new(None),
            failure_count: RwLock::new(0),
        }
    }

    /// Returns the outcome of the last successful cycle.
    pub fn last_outcome(&self) -> Option<SyncOutcome> {
        self.last_outcome.read().clone()
    }

    /// Returns the SHA HEAD was last observed at.
    pub fn commit(&self) -> Option<String> {
        self.commit.read().clone()
    }

    /// Returns the completion time of the last successful cycle.
    pub fn last_cycle(&self) -> Option<Instant> {
        *self.last_cycle.read()
    }

    /// Returns the duration since the last successful cycle.
    pub fn time_since_cycle(&self) -> Option<std::time::Duration> {
        self.last_cycle.read().map(|t| t.elapsed())
    }

    /// Records a successful cycle.
    pub fn record_success(&self, outcome: SyncOutcome) {
        let mut last_outcome = self.last_outcome.write();
        let mut commit = self.commit.write();
        let mut last_cycle = self.last_cycle.write();
        let mut last_error = self.last_error.write();
        let mut failure_count = self.failure_count.write();

        if let Some(sha) = outcome.commit() {
            *commit = Some(sha.to_string());
        }
        *last_outcome = Some(outcome);
        *last_cycle = Some(Instant::now());
        *last_error = None;
        *failure_count = 0;
    }

    /// Records a failed cycle.
    pub fn record_failure(&self, error: impl Into<String>) {
        let mut last_error = self.last_error.write();
        let mut failure_count = self.failure_count.write();

        *last_error = Some(error.into());
        *failure_count += 1;
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Returns the number of consecutive failed cycles.
    pub fn failure_count(&self) -> u32 {
        *self.failure_count.read()
    }

    /// Returns true if at least one cycle has completed successfully.
    pub fn has_synced(&self) -> bool {
        self.last_outcome.read().is_some()
    }

    /// Returns true if the last cycle completed without error.
    pub fn is_healthy(&self) -> bool {
        self.has_synced() && self.last_error.read().is_none()
    }

    /// Returns true if a new cycle is due for the given interval.
    pub fn needs_sync(&self, interval: std::time::Duration) -> bool {
        match self.time_since_cycle() {
            Some(elapsed) => elapsed >= interval,
            None => true,
        }
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}
