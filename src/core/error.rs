// Centralized error handling for the announce engine

use thiserror::Error;

/// Errors raised while deriving a client identity
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("version components must each be a single digit (0-9), got {major}.{minor}.{patch}")]
    InvalidVersion { major: u32, minor: u32, patch: u32 },

    #[error("malformed version string '{0}', expected MAJOR.MINOR.PATCH")]
    MalformedVersion(String),

    #[error("unsupported torrent client code '{0}'")]
    UnsupportedClient(String),
}

/// Errors raised when constructing the shared announce pacer
#[derive(Error, Debug)]
pub enum PacerError {
    #[error("announce rate must be a positive number of requests per second, got {0}")]
    InvalidRate(f64),
}

/// Errors raised while decoding bencoded data
#[derive(Error, Debug)]
pub enum BencodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unexpected byte 0x{0:02x} at offset {1}")]
    UnexpectedByte(u8, usize),

    #[error("invalid integer")]
    InvalidInteger,

    #[error("invalid byte string length")]
    InvalidLength,

    #[error("dictionary key is not a byte string")]
    InvalidKey,

    #[error("trailing data after value")]
    TrailingData,
}

/// Errors raised while reading a single .torrent file
#[derive(Error, Debug)]
pub enum MetainfoError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode metainfo: {0}")]
    Decode(#[from] BencodeError),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' has an invalid value")]
    InvalidField(&'static str),
}

/// Errors surfaced by the HTTP transport
///
/// These are always recovered locally: an announce that fails at the
/// transport layer falls back to the default re-announce interval.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_message() {
        let err = IdentityError::InvalidVersion {
            major: 4,
            minor: 16,
            patch: 5,
        };
        assert!(err.to_string().contains("4.16.5"));
    }

    #[test]
    fn test_invalid_rate_message() {
        let err = PacerError::InvalidRate(-1.0);
        assert!(err.to_string().contains("-1"));
    }
}
