//! Status and liveness endpoints
//!
//! - `/` - Service status: the API server is up
//! - `/health` - Liveness probe for orchestrators
//!
//! Anything else gets axum's default 404/405.

use crate::config::ApiConfig;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Body returned by `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl StatusResponse {
    pub fn running() -> Self {
        Self {
            status: "ok",
            message: "API server is running",
        }
    }
}

/// Body returned by `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "healthy" }
    }
}

/// State shared with every handler
///
/// Holds the startup configuration explicitly instead of a process-wide
/// app object.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

/// Root status handler
///
/// Always returns 200 with a fixed body; request headers and body are ignored.
async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    debug!(port = state.config().port, "Status requested");
    Json(StatusResponse::running())
}

/// Liveness probe handler
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!(port = state.config().port, "Health check requested");
    Json(HealthResponse::healthy())
}

/// Build the router for the status endpoints
pub fn build_router(config: ApiConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(AppState::new(config))
}
