//! # Pullwatch Git Engine
//!
//! Git synchronization engine for pullwatch.
//!
//! This crate keeps a local git working copy in sync with a named
//! remote: it fetches on a fixed cadence, fast-forwards when the local
//! branch is strictly behind, and creates an automatic merge commit
//! when histories have diverged. Conflicted merges are surfaced as
//! errors and left on disk for manual resolution.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pullwatch_git::{GitRepository, PollScheduler, SyncConfig, SyncState};
//!
//! let config = SyncConfig::builder()
//!     .target_path("/srv/checkout")
//!     .branch("main")
//!     .basic_auth("user", "token")
//!     .interval(Duration::from_secs(10))
//!     .build()?;
//!
//! let repo = Arc::new(GitRepository::open(config)?);
//! let state = Arc::new(SyncState::new());
//! let handle = PollScheduler::new(repo, state, Duration::from_secs(10)).start();
//! ```

pub mod error;
pub mod repository;
pub mod sync;

// Re-exports
pub use error::SyncError;
pub use repository::{GitRepository, SyncConfig};
pub use sync::{PollHandle, PollScheduler, SyncOutcome, SyncState, Synchronize};
