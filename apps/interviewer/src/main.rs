mod chat;
mod config;
mod errors;
mod models;
mod service;
mod shell;
mod store;
mod terminal;
mod wizard;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::FallbackPicker;
use crate::config::Config;
use crate::service::HttpInterviewService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so they never interleave with the conversation
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting interviewer v{}", env!("CARGO_PKG_VERSION"));

    let service = HttpInterviewService::new(&config.api_base_url)
        .context("Failed to build interview service client")?;
    info!("Interview service at {}", service.base_url());

    let picker = match config.fallback_seed {
        Some(seed) => {
            info!("Fallback picker seeded with {seed}");
            FallbackPicker::seeded(seed)
        }
        None => FallbackPicker::from_entropy(),
    };

    terminal::run(Arc::new(service), picker).await
}
