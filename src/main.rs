// =============================================================================
// MTF Analyst — Main Entry Point
// =============================================================================
//
// Loads the tradable symbol list once at startup, then serves multi-timeframe
// technical analyses over HTTP.  The symbol list is refreshed periodically in
// the background.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod binance;
mod commands;
mod error;
mod indicators;
mod market_data;
mod mtf_analysis;
mod registry;
mod report;
mod runtime_config;
mod signals;
mod types;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::binance::BinanceClient;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("MTF Analyst starting up");

    let mut config = RuntimeConfig::load_or_default("runtime_config.json")?;
    config.apply_env_overrides();
    config.validate().context("invalid runtime configuration")?;

    info!(
        base_url = %config.base_url,
        quote_asset = %config.quote_asset,
        candle_limit = config.candle_limit,
        fetch_timeout_secs = config.fetch_timeout_secs,
        http_timeout_secs = config.http_timeout_secs,
        "Configuration ready"
    );

    // ── 2. Exchange client & symbol registry ─────────────────────────────
    let client = Arc::new(BinanceClient::new(
        config.base_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?);

    let state = Arc::new(AppState::bootstrap(config, client).await);
    let registry = state.registry.snapshot();
    if !registry.is_loaded() {
        warn!("Symbol registry unavailable at startup; analyse requests will be rejected until a refresh succeeds");
    } else if registry.is_empty() {
        warn!(quote_asset = %state.runtime_config.quote_asset, "Exchange reported no TRADING symbols");
    }

    // ── 3. Periodic registry refresh ─────────────────────────────────────
    let refresh_secs = state.runtime_config.registry_refresh_secs;
    if refresh_secs > 0 {
        let refresh_state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(refresh_secs));
            // The first tick fires immediately; the registry was just loaded.
            interval.tick().await;
            loop {
                interval.tick().await;
                let registry = refresh_state.refresh_registry().await;
                info!(count = registry.len(), loaded = registry.is_loaded(), "Symbol registry refreshed");
            }
        });
    }

    // ── 4. API server ────────────────────────────────────────────────────
    let bind_addr = state.runtime_config.bind_addr.clone();
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    // ── 5. Serve until Ctrl+C ────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!(
        analyses_served = state.analyses_served(),
        "MTF Analyst shut down complete."
    );
    Ok(())
}
