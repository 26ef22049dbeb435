//! Polling and cycle tracking.
//!
//! This module provides the per-cycle outcome type, the scheduler that
//! drives synchronization on a fixed cadence, and the shared state
//! tracker the scheduler records into.

mod outcome;
mod scheduler;
mod state;

pub use outcome::{SyncOutcome, Synchronize};
pub use scheduler::{PollHandle, PollScheduler};
pub use state::SyncState;
