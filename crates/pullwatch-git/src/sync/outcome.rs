//! Per-cycle synchronization outcome and the synchronizer seam.

use async_trait::async_trait;

use crate::error::SyncError;

/// The result of one successful synchronization cycle.
///
/// Every cycle that does not fail resolves to exactly one of these
/// states; failures (conflicts, transport errors, unsupported merge
/// states) are reported through [`SyncError`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local history already contains the remote tip; nothing was done.
    UpToDate,
    /// The local branch pointer and working tree were moved to the
    /// remote tip. No commit was created.
    FastForwarded {
        /// SHA of the remote tip the branch now points at.
        commit: String,
    },
    /// Histories had diverged and a clean three-way merge produced a
    /// new two-parent commit.
    Merged {
        /// SHA of the newly created merge commit.
        commit: String,
    },
}

impl SyncOutcome {
    /// Returns the commit SHA this cycle left HEAD at, if it moved.
    pub fn commit(&self) -> Option<&str> {
        match self {
            Self::UpToDate => None,
            Self::FastForwarded { commit } | Self::Merged { commit } => Some(commit),
        }
    }
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpToDate => write!(f, "already up to date"),
            Self::FastForwarded { commit } => write!(f, "fast-forwarded to {}", commit),
            Self::Merged { commit } => write!(f, "merged remote changes in {}", commit),
        }
    }
}

/// A source of synchronization cycles.
///
/// This trait abstracts over the concrete git engine so the polling
/// scheduler can drive anything that knows how to reconcile a local
/// branch with a remote.
///
/// # Implementors
///
/// - `GitRepository` - Reconciles an on-disk working copy via libgit2
#[async_trait]
pub trait Synchronize: Send + Sync {
    /// Performs one best-effort synchronization cycle.
    ///
    /// Each call is independent: no state is carried between cycles and
    /// nothing is retried within a call.
    ///
    /// # Errors
    ///
    /// - `SyncError::RemoteNotFound` if the configured remote is absent
    /// - `SyncError::Authentication` / `SyncError::Network` on transport failure
    /// - `SyncError::ReferenceNotFound` if the remote branch does not exist
    /// - `SyncError::MergeConflict` if the merge was not clean
    /// - `SyncError::UnsupportedMergeState` if the analysis is unclassifiable
    async fn synchronize(&self) -> Result<SyncOutcome, SyncError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(SyncOutcome::UpToDate.to_string(), "already up to date");
        assert_eq!(
            SyncOutcome::FastForwarded {
                commit: "abc123".to_string()
            }
            .to_string(),
            "fast-forwarded to abc123"
        );
        assert_eq!(
            SyncOutcome::Merged {
                commit: "def456".to_string()
            }
            .to_string(),
            "merged remote changes in def456"
        );
    }

    #[test]
    fn test_outcome_commit() {
        assert_eq!(SyncOutcome::UpToDate.commit(), None);
        assert_eq!(
            SyncOutcome::FastForwarded {
                commit: "abc123".to_string()
            }
            .commit(),
            Some("abc123")
        );
    }
}
