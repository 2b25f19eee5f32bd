//! POST /stems/:name/toggle - expand or collapse a stem's instrument panel

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::render::DisclosureState;
use crate::AppState;

/// Toggle response; the page script swaps `panel_html` in place
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub stem: String,
    pub expanded: bool,
    pub button_label: String,
    pub panel_html: String,
}

pub fn disclosure_routes() -> Router<AppState> {
    Router::new().route("/stems/:name/toggle", post(toggle_stem))
}

async fn toggle_stem(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ToggleResponse>> {
    let outcome = state
        .controller
        .toggle_stem(&name)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("No instrument panel for stem '{}'", name)))?;

    debug!(stem = %outcome.stem, state = ?outcome.state, "Disclosure toggled");

    Ok(Json(ToggleResponse {
        expanded: outcome.state == DisclosureState::Expanded,
        stem: outcome.stem,
        button_label: outcome.button_label.to_string(),
        panel_html: outcome.panel_html,
    }))
}
