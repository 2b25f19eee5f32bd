//! stemview-ui library interface
//!
//! Upload controller, result renderer and the HTTP UI around them. Exposed
//! as a library so integration tests can build the router directly.

pub mod api;
pub mod client;
pub mod controller;
pub mod error;
pub mod models;
pub mod render;
pub mod view;

pub use crate::error::{ApiError, ApiResult, UploadError};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use stemview_common::events::EventBus;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::controller::UploadController;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Owns the page view and the in-flight guard
    pub controller: Arc<UploadController>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last failed upload, reported by /health
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(controller: Arc<UploadController>) -> Self {
        let event_bus = controller.event_bus().clone();
        Self {
            controller,
            event_bus,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::ui_routes())
        .merge(api::upload_routes())
        .merge(api::disclosure_routes())
        .route("/events", get(api::event_stream))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
