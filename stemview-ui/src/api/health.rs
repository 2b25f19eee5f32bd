//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "busy" while an upload waits for the backend
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub backend_url: String,
    /// Last failed upload, for diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let last_error = state.last_error.read().await.clone();
    let status = if state.controller.is_busy() { "busy" } else { "ok" };

    Json(HealthResponse {
        status: status.to_string(),
        module: "stemview".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        backend_url: state.controller.backend_url().to_string(),
        last_error,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
