pub mod channels;
pub mod config;
pub mod error;
pub mod extract;
pub mod gate;
pub mod notify;
pub mod pipeline;
pub mod retrieve;
pub mod storage;
pub mod types;

pub use config::{Config, RelaySettings};
pub use pipeline::{Outcome, Relay};

use self::channels::telegram::TelegramClient;
use self::extract::FileReferenceExtractor;
use self::gate::AccessGate;
use self::storage::R2Publisher;
use self::types::InboundEvent;

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Builds the transport and store handles and wires them into a relay.
pub async fn create_relay(settings: &RelaySettings) -> anyhow::Result<(Relay, TelegramClient)> {
    let telegram = TelegramClient::new(
        reqwest::Client::new(),
        settings.telegram.bot_token.clone(),
        settings.telegram.api_base.clone(),
    );
    let username = telegram
        .get_me()
        .await
        .context("telegram bot token rejected")?;
    info!(bot = %username, "authorized on telegram");

    let publisher = R2Publisher::new(&settings.storage);
    info!(bucket = %publisher.bucket(), "object store configured");

    let shared = Arc::new(telegram.clone());
    let relay = Relay::new(
        AccessGate::new(settings.owner_id),
        FileReferenceExtractor::default(),
        shared.clone(),
        Arc::new(publisher),
        shared,
    );
    Ok((relay, telegram))
}

/// Runs the poller and the single consumer until the event stream ends.
pub async fn start(settings: RelaySettings) -> anyhow::Result<()> {
    let (relay, telegram) = create_relay(&settings).await?;

    let (tx, rx) = mpsc::channel::<InboundEvent>(settings.telegram.queue_capacity);
    let timeout = settings.telegram.poll_timeout_seconds;
    let retry_delay = Duration::from_secs(settings.telegram.retry_delay_seconds);
    let poller = tokio::spawn(async move {
        telegram.poll_updates(tx, timeout, retry_delay).await;
    });

    relay.run(rx).await;
    poller.abort();
    Ok(())
}
