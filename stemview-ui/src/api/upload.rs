//! POST /upload - browser form submission
//!
//! Reads the multipart form, hands the file to the controller and returns
//! the two re-rendered page regions.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::{http::UPLOAD_FIELD, AudioUpload};
use crate::controller::UploadOutcome;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Audio files are far larger than axum's default body limit
pub const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// POST /upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub upload_id: Uuid,
    pub completed: bool,
    pub status_html: String,
    pub results_html: String,
}

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Pull the `file` field out of the form
///
/// A browser submits an empty part with an empty file name when nothing was
/// chosen; that counts as no file.
async fn read_upload(mut multipart: Multipart) -> ApiResult<Option<AudioUpload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

        if file_name.is_empty() && bytes.is_empty() {
            return Ok(None);
        }

        let file_name = if file_name.is_empty() {
            "upload".to_string()
        } else {
            file_name
        };
        let mut upload = AudioUpload::new(file_name, bytes.to_vec());
        if let Some(content_type) = content_type {
            upload = upload.with_content_type(content_type);
        }
        return Ok(Some(upload));
    }

    Ok(None)
}

/// POST /upload
///
/// 400 without a file, 409 while another upload runs. Backend failures are
/// part of the rendered status region, so they still answer 200.
async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let upload = read_upload(multipart).await?;

    let outcome = state.controller.submit(upload).await.map_err(|e| {
        warn!("Upload rejected: {}", e);
        ApiError::from(e)
    })?;

    if let UploadOutcome::Failed { error, .. } = &outcome {
        *state.last_error.write().await = Some(error.to_string());
    }

    Ok(Json(UploadResponse {
        upload_id: outcome.upload_id(),
        completed: outcome.is_completed(),
        status_html: state.controller.status_html().await,
        results_html: state.controller.results_html().await,
    }))
}
