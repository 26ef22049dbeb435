//! Synchronizer configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Configuration for the repository synchronizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// Path to the local working copy (the directory containing `.git`).
    target_path: PathBuf,

    /// Name of the remote to fetch from.
    #[serde(default = "default_remote_name")]
    remote_name: String,

    /// Branch to keep in sync with the remote.
    #[serde(default = "default_branch")]
    branch: String,

    /// Username for authenticated fetches (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,

    /// Password or token for authenticated fetches (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,

    /// Interval between synchronization cycles.
    #[serde(
        default = "default_interval",
        rename = "intervalSeconds",
        with = "seconds_serde"
    )]
    interval: Duration,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_interval() -> Duration {
    Duration::from_secs(10)
}

impl SyncConfig {
    /// Creates a new builder for SyncConfig.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Returns the path to the local working copy.
    pub fn target_path(&self) -> &PathBuf {
        &self.target_path
    }

    /// Returns the name of the remote to fetch from.
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    /// Returns the branch being kept in sync.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Returns the username for authentication.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the password/token for authentication.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns the interval between synchronization cycles.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the fully qualified local branch reference name.
    pub fn local_ref(&self) -> String {
        format!("refs/heads/{}", self.branch)
    }

    /// Returns the fully qualified remote-tracking reference name.
    pub fn remote_ref(&self) -> String {
        format!("refs/remotes/{}/{}", self.remote_name, self.branch)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InvalidConfig` if the target path is empty,
    /// the remote or branch name is empty, or only one half of the
    /// username/password pair is present.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.target_path.as_os_str().is_empty() {
            return Err(SyncError::invalid_config("target path is empty"));
        }
        if self.remote_name.is_empty() {
            return Err(SyncError::invalid_config("remote name is empty"));
        }
        if self.branch.is_empty() {
            return Err(SyncError::invalid_config("branch name is empty"));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(SyncError::invalid_config(
                "username and password must be supplied together",
            ));
        }
        Ok(())
    }
}

/// Builder for SyncConfig.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    target_path: Option<PathBuf>,
    remote_name: Option<String>,
    branch: Option<String>,
    username: Option<String>,
    password: Option<String>,
    interval: Option<Duration>,
}

impl SyncConfigBuilder {
    /// Sets the path to the local working copy.
    pub fn target_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_path = Some(path.into());
        self
    }

    /// Sets the remote to fetch from.
    pub fn remote_name(mut self, name: impl Into<String>) -> Self {
        self.remote_name = Some(name.into());
        self
    }

    /// Sets the branch to keep in sync.
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Sets basic authentication credentials.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the interval between synchronization cycles.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<SyncConfig, &'static str> {
        let target_path = self.target_path.ok_or("target_path is required")?;

        Ok(SyncConfig {
            target_path,
            remote_name: self.remote_name.unwrap_or_else(default_remote_name),
            branch: self.branch.unwrap_or_else(default_branch),
            username: self.username,
            password: self.password,
            interval: self.interval.unwrap_or_else(default_interval),
        })
    }
}

mod seconds_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
