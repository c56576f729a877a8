use crate::announce::client::{AnnounceClient, HttpTransport};
use crate::announce::task::AnnounceTask;
use crate::core::config::Config;
use crate::identity::Identity;
use crate::pacing::Pacer;
use crate::torrent;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Grace period for loops to finish their final stop announces
const SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

/// Load every torrent under the configured folder and announce each one
/// until the process is interrupted
///
/// Torrents are loaded once at startup; files appearing later are not picked
/// up. One announce loop is spawned per torrent, all sharing a single pacer
/// and transport. A loop's failures only ever produce warnings, they never
/// take the process down.
pub async fn run(config: &Config, identity: Identity) -> Result<()> {
    let torrents = torrent::load_torrents(&config.folder)?;
    if torrents.is_empty() {
        info!(folder = %config.folder.display(), "No torrent files found, nothing to announce");
        return Ok(());
    }

    let identity = Arc::new(identity);
    info!(
        torrents = torrents.len(),
        port = config.port,
        peer_id = %identity.peer_id,
        user_agent = %identity.user_agent,
        rate = config.rate,
        "Starting announce loops"
    );

    let pacer = Arc::new(Pacer::new(config.rate)?);
    let transport =
        Arc::new(HttpTransport::new().context("Failed to create HTTP transport")?);
    let client = Arc::new(AnnounceClient::new(transport, identity, config.port));

    let token = CancellationToken::new();
    let mut set = JoinSet::new();

    for torrent in torrents {
        let task = AnnounceTask::new(torrent, Arc::clone(&client), Arc::clone(&pacer));
        set.spawn(task.run(token.child_token()));
    }

    tokio::select! {
        _ = shutdown_signal() => {
            token.cancel();
            wait_all_with_grace(&mut set).await;
        }
        _ = async { while set.join_next().await.is_some() {} } => {
            info!("All announce loops finished");
        }
    }

    info!("Shutting down gracefully");
    Ok(())
}

async fn drain(set: &mut JoinSet<()>) {
    while set.join_next().await.is_some() {}
}

/// Wait for every loop to acknowledge termination, bounded
///
/// A stuck stop announce must not hang shutdown forever; past the grace
/// period the remaining loops are aborted outright.
async fn wait_all_with_grace(set: &mut JoinSet<()>) {
    if tokio::time::timeout(SHUTDOWN_GRACE, drain(set)).await.is_err() {
        warn!(
            grace_secs = SHUTDOWN_GRACE.as_secs(),
            "Shutdown grace period exceeded, aborting remaining announce loops"
        );
        set.abort_all();
        drain(set).await;
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
