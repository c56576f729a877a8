use anyhow::{Context, Result};
use clap::Parser;
use phantomseed::core::config::Config;
use phantomseed::core::{supervisor, tracing_init};
use phantomseed::identity::{self, ClientKind, Version};
use tracing::info;

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    tracing_init::init_tracing(&config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<()> {
    let version: Version = config.client_version.parse()?;
    let identity = identity::generate(ClientKind::QBittorrent, version, config.seed)?;

    info!(
        folder = %config.folder.display(),
        port = config.port,
        version = %version,
        rate = config.rate,
        "phantomseed starting"
    );

    supervisor::run(&config, identity).await
}
