use crate::core::error::IdentityError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Torrent clients this tool can impersonate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    QBittorrent,
}

impl ClientKind {
    /// Two-character client code used in Azureus-style peer ids
    pub fn code(&self) -> &'static str {
        match self {
            ClientKind::QBittorrent => "qB",
        }
    }

    /// Canonical client name used in the User-Agent header
    pub fn display_name(&self) -> &'static str {
        match self {
            ClientKind::QBittorrent => "qBittorrent",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, IdentityError> {
        match code {
            "qB" => Ok(ClientKind::QBittorrent),
            other => Err(IdentityError::UnsupportedClient(other.to_string())),
        }
    }
}

/// Client version advertised to trackers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdentityError::MalformedVersion(s.to_string());

        let mut parts = s.split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(malformed)?;
        let minor = parts.next().and_then(|p| p.parse().ok()).ok_or_else(malformed)?;
        let patch = parts.next().and_then(|p| p.parse().ok()).ok_or_else(malformed)?;

        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Version::new(major, minor, patch))
    }
}

/// Client identity shared by every announce loop
///
/// Created once per process run and never mutated.
#[derive(Debug, Clone)]
pub struct Identity {
    pub client: ClientKind,
    pub version: Version,
    pub peer_id: String,
    pub user_agent: String,
}

const PEER_ID_SUFFIX_LEN: usize = 12;
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Derive the client identity announced to trackers
///
/// The peer id follows the Azureus-style convention: `-qB4450-` followed by
/// 12 random letters, 20 characters total. Clients encode versions past 9 as
/// hexadecimal in that scheme; supporting that would complicate the encoding,
/// so each version component is restricted to a single decimal digit.
///
/// A `seed` makes the random suffix fully reproducible; without one the
/// suffix is drawn from OS randomness.
pub fn generate(
    client: ClientKind,
    version: Version,
    seed: Option<u64>,
) -> Result<Identity, IdentityError> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    generate_with(client, version, &mut rng)
}

/// [`generate`] with an explicit random source
pub fn generate_with<R: Rng>(
    client: ClientKind,
    version: Version,
    rng: &mut R,
) -> Result<Identity, IdentityError> {
    if version.major > 9 || version.minor > 9 || version.patch > 9 {
        return Err(IdentityError::InvalidVersion {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
        });
    }

    let suffix: String = (0..PEER_ID_SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    let peer_id = format!(
        "-{}{}{}{}0-{}",
        client.code(),
        version.major,
        version.minor,
        version.patch,
        suffix
    );
    debug_assert_eq!(peer_id.len(), 20);

    let user_agent = format!("{}/{}", client.display_name(), version);

    info!(peer_id = %peer_id, user_agent = %user_agent, "Generated torrent client identity");

    Ok(Identity {
        client,
        version,
        peer_id,
        user_agent,
    })
}
