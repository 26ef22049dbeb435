//! Git repository access.
//!
//! This module provides the synchronizer configuration and the
//! libgit2-backed working-copy synchronizer.

mod config;
mod git_ops;

pub use config::SyncConfig;
pub use git_ops::GitRepository;
