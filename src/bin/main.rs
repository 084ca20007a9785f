//! media-relay
//!
//! Stores files the owner sends to the bot in an R2 bucket and replies with
//! their public URL.
//! Run with: TELEGRAM_BOT_TOKEN=xxx OWNER_ID=xxx CF_ACCOUNT_ID=xxx \
//! CF_ACCESS_KEY_ID=xxx CF_ACCESS_KEY_SECRET=xxx CF_BUCKET_NAME=xxx media-relay

use anyhow::Context;
use media_relay::config::load_config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("media_relay=info")),
        )
        .init();

    let settings = load_config()
        .and_then(|cfg| cfg.resolve())
        .context("invalid configuration")?;

    tokio::select! {
        result = media_relay::start(settings) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            Ok(())
        }
    }
}
