use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// Spoof seeding of torrent files by sending periodic fake announces
/// to their trackers. No data is ever transferred.
#[derive(Parser, Debug, Clone)]
#[command(name = "phantomseed")]
pub struct Config {
    /// Folder to search recursively for .torrent files
    #[arg(short, long)]
    pub folder: PathBuf,

    /// Port reported to trackers as the listening port
    #[arg(short, long, default_value_t = 6881)]
    pub port: u16,

    /// Torrent client version to impersonate (MAJOR.MINOR.PATCH)
    #[arg(short = 'v', long = "version", default_value = "4.4.5")]
    pub client_version: String,

    /// Maximum announce requests per second across all torrents
    #[arg(short, long, default_value_t = 1.0)]
    pub rate: f64,

    /// Seed for deterministic peer id generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log output format: "console" or "json"
    #[arg(long, default_value = "console")]
    pub log_format: String,
}

impl Config {
    /// Validate configuration values
    ///
    /// All failures here are fatal startup errors: reported once, process
    /// exits non-zero, never retried.
    pub fn validate(&self) -> Result<()> {
        if !self.folder.exists() {
            bail!("folder '{}' does not exist", self.folder.display());
        }

        if !self.folder.is_dir() {
            bail!("'{}' is not a directory", self.folder.display());
        }

        if self.port == 0 {
            bail!("port must be greater than 0");
        }

        if !self.rate.is_finite() || self.rate <= 0.0 {
            bail!("rate must be a positive number, got {}", self.rate);
        }

        let valid_formats = ["console", "json"];
        if !valid_formats.contains(&self.log_format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: console, json",
                self.log_format
            );
        }

        Ok(())
    }
}
