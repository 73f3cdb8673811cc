mod api;
mod config;
mod error;
mod homework;
mod platform;
mod poller;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::PracticumClient;
use crate::config::Config;
use crate::platform::telegram::TelegramNotifier;
use crate::poller::{Poller, SystemClock};

type HomeworkPoller = Poller<PracticumClient, TelegramNotifier, SystemClock>;

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets and RUST_LOG may live in a .env file next to the binary
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,homework_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    config.apply_env(|name| std::env::var(name).ok());

    let Some(mut poller) = prepare_poller(&config)? else {
        std::process::exit(1);
    };

    info!("Bot is starting...");
    poller.run().await;

    Ok(())
}

/// Build the poller, or log a critical failure and return `None` when a
/// required secret is missing. Nothing is fetched or sent here.
fn prepare_poller(config: &Config) -> Result<Option<HomeworkPoller>> {
    let credentials = match config.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(severity = "critical", "{}", e);
            return Ok(None);
        }
    };

    info!("Configuration loaded successfully");
    info!("  Endpoint: {}", config.practicum.endpoint);
    info!("  Retry period: {}s", config.poller.retry_period_secs);
    info!("  Request timeout: {}s", config.practicum.request_timeout_secs);
    info!("  Chat: {}", credentials.chat_id);

    let source = PracticumClient::new(
        &config.practicum.endpoint,
        &credentials.practicum_token,
        config.request_timeout(),
    )
    .context("Failed to build homework API client")?;
    let notifier = TelegramNotifier::new(&credentials.telegram_token);

    Ok(Some(Poller::new(
        source,
        notifier,
        SystemClock,
        &credentials.chat_id,
        config.retry_period(),
    )))
}
