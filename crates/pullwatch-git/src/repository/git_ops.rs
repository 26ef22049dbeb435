//! Git repository synchronization using git2 (libgit2 bindings).

use std::path::Path;

use async_trait::async_trait;
use git2::build::CheckoutBuilder;
use git2::{AnnotatedCommit, Cred, FetchOptions, RemoteCallbacks, Repository};
use tracing::{debug, info};

use super::SyncConfig;
use crate::error::SyncError;
use crate::sync::{SyncOutcome, Synchronize};

/// A git working copy kept in sync with a named remote.
///
/// The repository is re-opened from disk on every cycle, so each call
/// to [`Synchronize::synchronize`] is computed from the current on-disk
/// state and holds nothing over from previous cycles.
pub struct GitRepository {
    config: SyncConfig,
}

impl GitRepository {
    /// Opens the working copy described by `config`.
    ///
    /// The repository is opened once here to validate the target path;
    /// subsequent cycles open their own handle.
    ///
    /// # Errors
    ///
    /// - `SyncError::InvalidConfig` if the configuration is invalid
    /// - `SyncError::RepositoryOpen` if the path is not a git repository
    pub fn open(config: SyncConfig) -> Result<Self, SyncError> {
        config.validate()?;
        Self::open_on_disk(&config)?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the local repository path.
    pub fn target_path(&self) -> &Path {
        self.config.target_path()
    }

    /// Returns the current HEAD commit SHA.
    pub async fn head_commit(&self) -> Result<String, SyncError> {
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || -> Result<String, SyncError> {
            let repo = Self::open_on_disk(&config)?;
            let head = repo.head()?.peel_to_commit()?;
            Ok(head.id().to_string())
        })
        .await
        .map_err(|e| SyncError::Git(git2::Error::from_str(&format!("task failed: {}", e))))?
    }

    fn open_on_disk(config: &SyncConfig) -> Result<Repository, SyncError> {
        Repository::open(config.target_path())
            .map_err(|e| SyncError::open(config.target_path(), e.message()))
    }

    /// Blocking synchronization cycle.
    fn synchronize_blocking(config: &SyncConfig) -> Result<SyncOutcome, SyncError> {
        let repo = Self::open_on_disk(config)?;

        Self::fetch_remote(&repo, config)?;

        let remote_ref = config.remote_ref();
        let reference = repo
            .find_reference(&remote_ref)
            .map_err(|_| SyncError::ReferenceNotFound(remote_ref))?;
        let remote_tip = repo.reference_to_annotated_commit(&reference)?;

        let (analysis, _preference) = repo.merge_analysis(&[&remote_tip])?;

        // Unborn must be checked before fast-forward: libgit2 reports an
        // unborn HEAD with the fast-forward flag also set.
        if analysis.is_up_to_date() {
            debug!("local history already contains {}", remote_tip.id());
            Ok(SyncOutcome::UpToDate)
        } else if analysis.is_unborn() {
            Err(SyncError::UnsupportedMergeState(
                "local branch has no commits yet".to_string(),
            ))
        } else if analysis.is_fast_forward() {
            Self::fast_forward(&repo, config, &remote_tip)
        } else if analysis.is_normal() {
            Self::merge(&repo, &remote_tip)
        } else {
            Err(SyncError::UnsupportedMergeState(format!(
                "unclassifiable merge analysis: {:?}",
                analysis
            )))
        }
    }

    /// Fetches the configured branch from the remote, using the remote's
    /// default refspecs so the remote-tracking reference is updated.
    fn fetch_remote(repo: &Repository, config: &SyncConfig) -> Result<(), SyncError> {
        let mut remote = repo
            .find_remote(config.remote_name())
            .map_err(|_| SyncError::RemoteNotFound(config.remote_name().to_string()))?;

        let mut callbacks = RemoteCallbacks::new();
        if let (Some(username), Some(password)) = (config.username(), config.password()) {
            let username = username.to_string();
            let password = password.to_string();
            callbacks.credentials(move |_url, _username_from_url, _allowed| {
                Cred::userpass_plaintext(&username, &password)
            });
        }

        let mut options = FetchOptions::new();
        options.remote_callbacks(callbacks);

        debug!(
            "fetching {} from remote {}",
            config.branch(),
            config.remote_name()
        );

        remote
            .fetch(&[] as &[&str], Some(&mut options), None)
            .map_err(SyncError::from_fetch)
    }

    /// Moves the local branch pointer and working tree to the remote tip.
    fn fast_forward(
        repo: &Repository,
        config: &SyncConfig,
        remote_tip: &AnnotatedCommit<'_>,
    ) -> Result<SyncOutcome, SyncError> {
        let target = remote_tip.id();
        info!("fast-forwarding {} to {}", config.branch(), target);

        let object = repo.find_object(target, None)?;
        repo.checkout_tree(&object, Some(CheckoutBuilder::default().safe()))?;

        let local_ref = config.local_ref();
        let mut reference = repo
            .find_reference(&local_ref)
            .map_err(|_| SyncError::ReferenceNotFound(local_ref.clone()))?;
        reference.set_target(target, "pullwatch: fast-forward")?;
        repo.set_head(&local_ref)?;

        Ok(SyncOutcome::FastForwarded {
            commit: target.to_string(),
        })
    }

    /// Performs a three-way merge of the remote tip into HEAD and, when
    /// clean, commits it with both parents.
    fn merge(repo: &Repository, remote_tip: &AnnotatedCommit<'_>) -> Result<SyncOutcome, SyncError> {
        info!("histories diverged, merging {}", remote_tip.id());

        let mut checkout = CheckoutBuilder::default();
        checkout.allow_conflicts(true);
        repo.merge(&[remote_tip], None, Some(&mut checkout))?;

        let mut index = repo.index()?;
        if index.has_conflicts() {
            // The working tree and index stay conflicted for manual
            // resolution; no cleanup, no commit.
            return Err(SyncError::MergeConflict);
        }

        let tree_id = index.write_tree_to(repo)?;
        let tree = repo.find_tree(tree_id)?;

        let local_head = repo.head()?.peel_to_commit()?;
        let remote_commit = repo.find_commit(remote_tip.id())?;

        let signature = repo.signature()?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M");
        let message = format!("Automatic merge by pullwatch on {}", timestamp);

        let merge_commit = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &message,
            &tree,
            &[&local_head, &remote_commit],
        )?;

        repo.cleanup_state()?;

        Ok(SyncOutcome::Merged {
            commit: merge_commit.to_string(),
        })
    }
}

#[async_trait]
impl Synchronize for GitRepository {
    async fn synchronize(&self) -> Result<SyncOutcome, SyncError> {
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || Self::synchronize_blocking(&config))
            .await
            .map_err(|e| SyncError::Git(git2::Error::from_str(&format!("task failed: {}", e))))?
    }
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("target_path", &self.config.target_path())
            .field("remote", &self.config.remote_name())
            .field("branch", &self.config.branch())
            .finish()
    }
}
