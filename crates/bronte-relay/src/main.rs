//! `bronte-relay` binary entrypoint.
//!
//! Starts the Axum server using configuration from environment variables.

use bronte_relay::{KeyPool, RelayConfig, RelayServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Respect `RUST_LOG` if set; otherwise default to relay-friendly info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = RelayConfig::default();
    let keys = KeyPool::from_env();
    if keys.default.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; generate requests will fail");
    }

    let port = config.port;
    let server = RelayServer::new(config, keys)?;
    server.start("0.0.0.0", port).await?;
    Ok(())
}
