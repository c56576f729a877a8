use crate::bencode::{self, Value};
use crate::core::error::MetainfoError;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};

/// One torrent being spoofed
///
/// Owned exclusively by its announce loop once the supervisor starts; the
/// `announces` counter is only ever touched from that loop.
#[derive(Debug, Clone)]
pub struct TorrentFile {
    /// Source .torrent file, kept for diagnostics
    pub path: PathBuf,
    /// Display name from the metainfo `info` dictionary
    pub name: String,
    /// Tracker announce endpoint
    pub announce_url: String,
    /// SHA-1 of the canonically re-encoded `info` dictionary
    pub info_hash: [u8; 20],
    /// Announce attempts issued so far this run
    pub announces: u64,
}

impl TorrentFile {
    pub fn read(path: &Path) -> Result<Self, MetainfoError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(path.to_path_buf(), &bytes)
    }

    pub fn from_bytes(path: PathBuf, bytes: &[u8]) -> Result<Self, MetainfoError> {
        let metainfo = bencode::decode(bytes)?;

        let announce_url = metainfo
            .get(b"announce")
            .ok_or(MetainfoError::MissingField("announce"))?
            .as_text()
            .ok_or(MetainfoError::InvalidField("announce"))?;

        let info = metainfo
            .get(b"info")
            .ok_or(MetainfoError::MissingField("info"))?;
        if !matches!(info, Value::Dict(_)) {
            return Err(MetainfoError::InvalidField("info"));
        }

        let name = info
            .get(b"name")
            .ok_or(MetainfoError::MissingField("name"))?
            .as_text()
            .ok_or(MetainfoError::InvalidField("name"))?;

        // Trackers identify the torrent by the digest of the info dict as it
        // appears in the file, so it is re-encoded exactly as received.
        let info_hash: [u8; 20] = Sha1::digest(info.encode()).into();

        Ok(Self {
            path,
            name,
            announce_url,
            info_hash,
            announces: 0,
        })
    }

    pub fn info_hash_hex(&self) -> String {
        hex::encode(self.info_hash)
    }
}
