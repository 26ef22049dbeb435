//! Error types for repository synchronization.

use std::path::PathBuf;

/// Errors that can occur while synchronizing a repository with its remote.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The configured remote does not exist in the repository.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// The remote rejected the supplied credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The fetch failed at the transport level.
    #[error("network error: {0}")]
    Network(String),

    /// The remote-tracking branch does not exist after fetching.
    #[error("reference not found: {0}")]
    ReferenceNotFound(String),

    /// The three-way merge produced conflicts; the working tree is left
    /// in a conflicted state for manual resolution.
    #[error("merge produced conflicts, manual resolution required")]
    MergeConflict,

    /// The merge analysis could not be classified (unborn branch or a
    /// flag combination the synchronizer does not handle).
    #[error("unsupported merge state: {0}")]
    UnsupportedMergeState(String),

    /// The target path could not be opened as a git repository.
    #[error("failed to open repository at {path}: {reason}")]
    RepositoryOpen { path: PathBuf, reason: String },

    /// Invalid synchronizer configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Any other failure reported by the underlying git engine.
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

impl SyncError {
    /// Creates a new repository-open error.
    pub fn open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::RepositoryOpen {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new invalid-configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Classifies a fetch failure into the transport-level taxonomy.
    ///
    /// Authentication rejections map to [`SyncError::Authentication`],
    /// transport classes (net, http, ssh, ssl) to [`SyncError::Network`],
    /// and everything else passes through as [`SyncError::Git`].
    pub fn from_fetch(err: git2::Error) -> Self {
        use git2::{ErrorClass, ErrorCode};

        if err.code() == ErrorCode::Auth {
            return Self::Authentication(err.message().to_string());
        }

        match err.class() {
            ErrorClass::Net | ErrorClass::Http | ErrorClass::Ssh | ErrorClass::Ssl => {
                Self::Network(err.message().to_string())
            },
            _ => Self::Git(err),
        }
    }

    /// Returns true if this error left the working tree conflicted.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::MergeConflict)
    }

    /// Returns true if this is a transient error that might succeed on
    /// a later cycle without operator intervention.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns true if this error is terminal at startup rather than
    /// recoverable by skipping the cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RepositoryOpen { .. } | Self::InvalidConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::RemoteNotFound("origin".to_string());
        assert_eq!(err.to_string(), "remote not found: origin");

        let err = SyncError::ReferenceNotFound("refs/remotes/origin/master".to_string());
        assert_eq!(
            err.to_string(),
            "reference not found: refs/remotes/origin/master"
        );

        let err = SyncError::open("/tmp/not-a-repo", "could not find repository");
        assert_eq!(
            err.to_string(),
            "failed to open repository at /tmp/not-a-repo: could not find repository"
        );

        let err = SyncError::invalid_config("target path is empty");
        assert_eq!(
            err.to_string(),
            "invalid configuration: target path is empty"
        );
    }

    #[test]
    fn test_from_fetch_classifies_auth() {
        let raw = git2::Error::new(
            git2::ErrorCode::Auth,
            git2::ErrorClass::Http,
            "authentication required",
        );
        let err = SyncError::from_fetch(raw);
        assert!(matches!(err, SyncError::Authentication(_)));
    }

    #[test]
    fn test_from_fetch_classifies_network() {
        let raw = git2::Error::new(
            git2::ErrorCode::GenericError,
            git2::ErrorClass::Net,
            "connection refused",
        );
        let err = SyncError::from_fetch(raw);
        assert!(matches!(err, SyncError::Network(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_from_fetch_passes_through_other_errors() {
        let raw = git2::Error::new(
            git2::ErrorCode::GenericError,
            git2::ErrorClass::Odb,
            "object database corrupt",
        );
        let err = SyncError::from_fetch(raw);
        assert!(matches!(err, SyncError::Git(_)));
    }

    #[test]
    fn test_is_fatal() {
        assert!(SyncError::open("/tmp/x", "nope").is_fatal());
        assert!(SyncError::invalid_config("empty").is_fatal());
        assert!(!SyncError::MergeConflict.is_fatal());
        assert!(!SyncError::Network("timeout".to_string()).is_fatal());
    }

    #[test]
    fn test_is_conflict() {
        assert!(SyncError::MergeConflict.is_conflict());
        assert!(!SyncError::RemoteNotFound("origin".to_string()).is_conflict());
    }
}
