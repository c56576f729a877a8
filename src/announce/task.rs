use super::client::AnnounceClient;
use super::params::AnnounceEvent;
use crate::pacing::Pacer;
use crate::torrent::TorrentFile;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Upper bound on the final stop announce, pacing wait included
const STOP_ANNOUNCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Announce loop for a single torrent
///
/// Owns its [`TorrentFile`] for the lifetime of the loop; the shared client
/// and pacer are the only cross-task state it touches.
pub struct AnnounceTask {
    torrent: TorrentFile,
    client: Arc<AnnounceClient>,
    pacer: Arc<Pacer>,
}

impl AnnounceTask {
    pub fn new(torrent: TorrentFile, client: Arc<AnnounceClient>, pacer: Arc<Pacer>) -> Self {
        Self {
            torrent,
            client,
            pacer,
        }
    }

    /// Announce this torrent forever, until cancelled
    ///
    /// The first announce of the run carries `started`; later ones carry no
    /// event. Each cycle waits for a pacer slot, announces, then sleeps for
    /// the interval the tracker asked for. Cancellation is observed at both
    /// waits; the announce itself is never abandoned mid-flight, its
    /// duration is bounded by the transport timeout.
    ///
    /// After cancellation exactly one final `stopped` announce is attempted
    /// before the task finishes. It is never restarted.
    pub async fn run(mut self, token: CancellationToken) {
        loop {
            if token.is_cancelled() {
                break;
            }

            tokio::select! {
                _ = self.pacer.acquire() => {}
                _ = token.cancelled() => break,
            }

            let event = if self.torrent.announces == 0 {
                Some(AnnounceEvent::Started)
            } else {
                None
            };

            let response = self.client.report(&mut self.torrent, event).await;

            info!(
                torrent = %self.torrent.name,
                announces = self.torrent.announces,
                interval_secs = response.interval.as_secs(),
                "Re-announcing after interval"
            );

            tokio::select! {
                _ = time::sleep(response.interval) => {}
                _ = token.cancelled() => break,
            }
        }

        self.stop_announce().await;
    }

    /// Best-effort final `stopped` announce
    ///
    /// Still goes through the pacer so the stop burst of a large shutdown
    /// stays within the configured rate, but the whole attempt is bounded so
    /// shutdown can never hang on a slot or a dead tracker.
    async fn stop_announce(&mut self) {
        info!(torrent = %self.torrent.name, "Shutting down, sending final stopped announce");

        let stop = async {
            self.pacer.acquire().await;
            self.client
                .report(&mut self.torrent, Some(AnnounceEvent::Stopped))
                .await
        };

        match time::timeout(STOP_ANNOUNCE_TIMEOUT, stop).await {
            Ok(_) => info!(torrent = %self.torrent.name, "Final stopped announce sent"),
            Err(_) => {
                warn!(
                    torrent = %self.torrent.name,
                    timeout_secs = STOP_ANNOUNCE_TIMEOUT.as_secs(),
                    "Final stopped announce timed out"
                )
            }
        }
    }
}
