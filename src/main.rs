mod attachments;
mod chunk;
mod config;
mod filter;
mod llm;
mod locale;
mod pipeline;
mod platform;
mod prompt;
mod setup;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::attachments::HttpFetcher;
use crate::config::Config;
use crate::filter::ContentFilter;
use crate::llm::GeminiClient;
use crate::pipeline::Pipeline;
use crate::store::InMemoryConfigStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mcsupport_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let _ = dotenvy::dotenv();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Model: {}", config.gemini.model);
    info!("  Panel URL: {}", config.panel.url);
    info!("  HTTP timeout: {}s", config.http.timeout_secs);

    let filter = ContentFilter::new(config.moderation.banned_words.clone());
    info!("  Banned words: {}", filter.word_count());

    let timeout = config.http.timeout();
    let generator = GeminiClient::new(config.gemini.clone(), timeout)?;
    let fetcher = HttpFetcher::new(timeout)?;

    let pipeline = Arc::new(Pipeline::new(
        Arc::new(InMemoryConfigStore::new()),
        filter,
        Arc::new(generator),
        Arc::new(fetcher),
        config.panel.url.clone(),
    ));

    info!("Bot is starting...");
    platform::discord::run(&config.discord.bot_token, pipeline).await?;

    Ok(())
}
