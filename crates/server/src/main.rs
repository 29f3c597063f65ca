mod api;
mod health;

use std::sync::Arc;

use anyhow::Result;
use crossell_agent::PerplexityOracle;
use crossell_core::config::{AppConfig, LoadOptions};
use crossell_core::{CharFrequencyEmbedder, RecommendationEngine};

fn init_logging(config: &AppConfig) {
    use crossell_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let snapshot = crossell_store::load_snapshot(&config.data.dir)?;
    let oracle = PerplexityOracle::from_config(&config.oracle)?;

    if !oracle.is_configured() {
        tracing::warn!(
            event_name = "system.server.oracle_unconfigured",
            fail_policy = ?oracle.fail_policy(),
            "no oracle credential configured; confirmations will follow the fail policy"
        );
    }

    let engine = Arc::new(RecommendationEngine::new(
        snapshot,
        Arc::new(CharFrequencyEmbedder::default()),
        Arc::new(oracle),
    )?);

    let state = api::ApiState { engine };
    let router = health::router(state.clone()).merge(api::router(state));

    let address = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        bind_address = %address,
        "crossell-server started"
    );

    axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown()).await?;

    tracing::info!(event_name = "system.server.stopping", "crossell-server stopping");

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "system.server.signal_error",
            error = %error,
            "failed to listen for shutdown signal"
        );
    }
}
