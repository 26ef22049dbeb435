//! Pullwatch polling driver binary.

use std::sync::Arc;
use std::time::Duration;

use pullwatch_git::{GitRepository, PollScheduler, SyncConfig, SyncState};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match load_config()? {
        Some(config) => config,
        None => {
            print_usage();
            return Ok(());
        },
    };

    tracing::info!("Starting pullwatch v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Watching {} for updates every {} seconds",
        config.target_path().display(),
        config.interval().as_secs()
    );

    // Opening the repository is terminal at startup: no cycle runs if
    // the target path is not a valid repository.
    let interval = config.interval();
    let repository = match GitRepository::open(config) {
        Ok(repository) => Arc::new(repository),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        },
    };

    let state = Arc::new(SyncState::new());
    let scheduler = PollScheduler::new(repository, Arc::clone(&state), interval);
    let handle = scheduler.start();

    tokio::signal::ctrl_c().await?;

    handle.stop();
    println!("Exiting pullwatch");

    Ok(())
}

/// Loads the configuration from a JSON file given as the first argument,
/// or from PULLWATCH_* environment variables.
///
/// Returns `Ok(None)` when the target path, username or password is
/// missing or empty; the driver prints usage guidance and exits without
/// opening a repository in that case.
fn load_config() -> Result<Option<SyncConfig>, Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str::<SyncConfig>(&contents)?
        },
        None => config_from_env()?,
    };

    let complete = !config.target_path().as_os_str().is_empty()
        && config.username().is_some_and(|u| !u.is_empty())
        && config.password().is_some_and(|p| !p.is_empty());

    if !complete {
        return Ok(None);
    }

    config.validate()?;
    Ok(Some(config))
}

/// Builds a configuration from PULLWATCH_* environment variables.
fn config_from_env() -> Result<SyncConfig, Box<dyn std::error::Error>> {
    let mut builder = SyncConfig::builder()
        .target_path(std::env::var("PULLWATCH_TARGET_PATH").unwrap_or_default());

    if let Ok(remote) = std::env::var("PULLWATCH_REMOTE") {
        builder = builder.remote_name(remote);
    }
    if let Ok(branch) = std::env::var("PULLWATCH_BRANCH") {
        builder = builder.branch(branch);
    }
    if let (Ok(username), Ok(password)) = (
        std::env::var("PULLWATCH_USERNAME"),
        std::env::var("PULLWATCH_PASSWORD"),
    ) {
        builder = builder.basic_auth(username, password);
    }
    if let Ok(secs) = std::env::var("PULLWATCH_INTERVAL_SECS") {
        builder = builder.interval(Duration::from_secs(secs.parse::<u64>()?));
    }

    Ok(builder.build()?)
}

/// Prints usage guidance when the startup configuration is incomplete.
fn print_usage() {
    println!(
        "\nPlease supply a target directory (without the .git suffix) and a
valid username and password so private repositories can be fetched.

Usage:
    pullwatch [CONFIG.json]

The JSON config recognizes the keys:
    {{\"targetPath\", \"remoteName\", \"branch\", \"username\", \"password\", \"intervalSeconds\"}}

Without a config file, these environment variables are read instead:
    PULLWATCH_TARGET_PATH     path to the local working copy (required)
    PULLWATCH_USERNAME        remote username (required)
    PULLWATCH_PASSWORD        remote password or token (required)
    PULLWATCH_REMOTE          remote name (default: origin)
    PULLWATCH_BRANCH          branch to sync (default: master)
    PULLWATCH_INTERVAL_SECS   poll interval in seconds (default: 10)"
    );
}
