use super::params::{AnnounceEvent, AnnounceParams};
use crate::bencode::{self, Value};
use crate::core::error::TransportError;
use crate::identity::Identity;
use crate::torrent::TorrentFile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Re-announce interval used whenever the tracker does not provide one
pub const DEFAULT_ANNOUNCE_INTERVAL: Duration = Duration::from_secs(3600);

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Outbound HTTP capability the announce client talks through
///
/// Abstracted so announce construction and response handling are testable
/// without a tracker on the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, user_agent: &str) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by a shared reqwest client
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, user_agent: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}

/// Tracker's answer to one announce, reduced to what the loop needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerResponse {
    pub interval: Duration,
}

/// Builds, sends and interprets announce requests
///
/// One instance is shared by every announce loop; per-request state lives in
/// the call arguments.
pub struct AnnounceClient {
    transport: Arc<dyn Transport>,
    identity: Arc<Identity>,
    port: u16,
    default_interval: Duration,
}

impl AnnounceClient {
    pub fn new(transport: Arc<dyn Transport>, identity: Arc<Identity>, port: u16) -> Self {
        Self {
            transport,
            identity,
            port,
            default_interval: DEFAULT_ANNOUNCE_INTERVAL,
        }
    }

    /// Issue one announce for `torrent`
    ///
    /// Never fails: transport and decode problems are logged and resolved to
    /// the default interval. The torrent's attempt counter is incremented
    /// whether or not the request succeeded, so a flaky tracker is not sent
    /// `started` over and over.
    pub async fn report(
        &self,
        torrent: &mut TorrentFile,
        event: Option<AnnounceEvent>,
    ) -> TrackerResponse {
        let params = AnnounceParams {
            info_hash: &torrent.info_hash,
            peer_id: &self.identity.peer_id,
            uploaded: 0,
            downloaded: 0,
            left: 0,
            compact: 1,
            port: self.port,
            event,
        };

        let url = format!("{}?{}", torrent.announce_url, params.to_query());
        info!(torrent = %torrent.name, url = %url, "Announcing");

        let result = self.transport.get(&url, &self.identity.user_agent).await;
        torrent.announces += 1;

        let interval = match result {
            Ok(response) => {
                debug!(
                    torrent = %torrent.name,
                    status = response.status,
                    body = %String::from_utf8_lossy(&response.body),
                    "Tracker response"
                );
                parse_interval(&response.body, &torrent.name, self.default_interval)
            }
            Err(e) => {
                warn!(
                    torrent = %torrent.name,
                    error = %e,
                    "Unable to complete announce request"
                );
                self.default_interval
            }
        };

        TrackerResponse { interval }
    }
}

/// Extract the tracker's requested re-announce interval from a response body
///
/// A response that fails to decode, lacks an `interval` key, or carries a
/// non-positive value resolves to `default`.
pub fn parse_interval(body: &[u8], torrent_name: &str, default: Duration) -> Duration {
    let value = match bencode::decode(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                torrent = %torrent_name,
                error = %e,
                "Unable to parse tracker response"
            );
            return default;
        }
    };

    match value.get(b"interval").and_then(Value::as_int) {
        Some(seconds) if seconds > 0 => Duration::from_secs(seconds as u64),
        _ => default,
    }
}
