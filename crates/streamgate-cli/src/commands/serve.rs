//! Serve command for starting the stream API.
//!
//! `streamgate serve` - Start the HTTP server.

use anyhow::Context;
use std::path::Path;
use streamgate_core::StreamgateConfig;
use streamgate_server::StreamgateServer;

pub async fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = StreamgateConfig::load(config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    tracing::info!(config = %config_path.display(), "Loaded configuration");

    StreamgateServer::new(config)
        .run()
        .await
        .context("Stream API server failed")
}
