use anyhow::Context as _;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use echobot::Client;
use echobot::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        nickname = %config.nickname,
        channel = %config.channel,
        mode = ?config.reply_mode,
        "Starting echobot"
    );

    let session = Client::builder(config)?
        .await
        .context("Failed to connect")?;

    session.run().await.context("Connection lost")?;

    Ok(())
}
