// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  The command endpoint accepts the same
// text a chat user would type; the analyse endpoint returns the structured
// report alongside its rendered text.
//
// CORS is configured permissively; tighten `allowed_origins` in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::commands::{handle_command, resolve_error_reply};
use crate::error::ResolveError;
use crate::market_data::{CandleSource, SymbolSource};
use crate::registry::RegistryStatus;
use crate::report::Report;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: SymbolSource + CandleSource + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health::<S>))
        .route("/api/v1/analyse/:coin", get(analyse::<S>))
        .route("/api/v1/command", post(command::<S>))
        .route("/api/v1/symbols/refresh", post(refresh_symbols::<S>))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    registry: RegistryStatus,
    registry_symbols: usize,
    registry_loaded_at: DateTime<Utc>,
    analyses_served: u64,
    server_time: i64,
}

async fn health<S>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse
where
    S: SymbolSource + CandleSource + 'static,
{
    let registry = state.registry.snapshot();
    Json(HealthResponse {
        status: "ok",
        registry: registry.status().clone(),
        registry_symbols: registry.len(),
        registry_loaded_at: registry.loaded_at(),
        analyses_served: state.analyses_served(),
        server_time: Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Analyse
// =============================================================================

#[derive(Serialize)]
struct AnalyseResponse {
    #[serde(flatten)]
    report: Report,
    text: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

async fn analyse<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(coin): Path<String>,
) -> Response
where
    S: SymbolSource + CandleSource + 'static,
{
    let registry = state.registry.snapshot();
    let symbol = match registry.resolve(&coin) {
        Ok(symbol) => symbol,
        Err(e) => {
            let status = match e {
                ResolveError::EmptyInput => StatusCode::BAD_REQUEST,
                ResolveError::UnknownSymbol(_) => StatusCode::NOT_FOUND,
                ResolveError::RegistryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            warn!(coin = %coin, error = %e, "analyse request rejected");
            let body = ErrorResponse {
                error: e.to_string(),
                message: resolve_error_reply(&e),
            };
            return (status, Json(body)).into_response();
        }
    };

    let report = state.analyze(&symbol).await;
    info!(symbol = %symbol, request_id = %report.request_id, "analysis served");
    let text = report.render();
    Json(AnalyseResponse { report, text }).into_response()
}

// =============================================================================
// Command
// =============================================================================

#[derive(Deserialize)]
struct CommandRequest {
    text: String,
}

#[derive(Serialize)]
struct CommandResponse {
    reply: String,
}

async fn command<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CommandRequest>,
) -> impl IntoResponse
where
    S: SymbolSource + CandleSource + 'static,
{
    let reply = handle_command(state.as_ref(), &req.text).await;
    Json(CommandResponse { reply })
}

// =============================================================================
// Symbol registry refresh
// =============================================================================

#[derive(Serialize)]
struct RefreshResponse {
    registry: RegistryStatus,
    registry_symbols: usize,
    registry_loaded_at: DateTime<Utc>,
}

async fn refresh_symbols<S>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse
where
    S: SymbolSource + CandleSource + 'static,
{
    let registry = state.refresh_registry().await;
    info!(count = registry.len(), loaded = registry.is_loaded(), "registry refresh requested");
    Json(RefreshResponse {
        registry: registry.status().clone(),
        registry_symbols: registry.len(),
        registry_loaded_at: registry.loaded_at(),
    })
}
