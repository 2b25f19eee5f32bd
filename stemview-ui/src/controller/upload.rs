//! Upload lifecycle
//!
//! One `submit` per user action: validate, show processing, run the
//! decorative ticker alongside exactly one backend request, stop the ticker,
//! then render either the results or an error. Nothing propagates past
//! `submit` except the two rejections raised before any request is sent.

use chrono::Utc;
use std::sync::Arc;
use stemview_common::config::ProgressConfig;
use stemview_common::events::{EventBus, ViewEvent};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::progress::ProgressTicker;
use crate::client::{AnalysisBackend, AudioUpload};
use crate::error::UploadError;
use crate::models::AudioTypeSummary;
use crate::render::disclosure::DisclosureState;
use crate::view::{render_report, PageView, SharedView};

/// Shown when submit is pressed without a file
pub const NO_FILE_MESSAGE: &str = "Select a song first";

/// How an accepted upload ended
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Completed {
        upload_id: Uuid,
        summary: AudioTypeSummary,
        stem_count: usize,
    },
    Failed {
        upload_id: Uuid,
        error: UploadError,
    },
}

impl UploadOutcome {
    pub fn upload_id(&self) -> Uuid {
        match self {
            UploadOutcome::Completed { upload_id, .. } | UploadOutcome::Failed { upload_id, .. } => {
                *upload_id
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, UploadOutcome::Completed { .. })
    }
}

/// Result of a disclosure toggle, ready for the page script
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub stem: String,
    pub state: DisclosureState,
    pub button_label: &'static str,
    pub panel_html: String,
}

pub struct UploadController {
    backend: Arc<dyn AnalysisBackend>,
    view: SharedView,
    event_bus: EventBus,
    progress: ProgressConfig,
    in_flight: Mutex<()>,
}

impl UploadController {
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        event_bus: EventBus,
        progress: ProgressConfig,
    ) -> Self {
        Self {
            backend,
            view: PageView::shared(),
            event_bus,
            progress,
            in_flight: Mutex::new(()),
        }
    }

    pub fn view(&self) -> SharedView {
        self.view.clone()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn backend_url(&self) -> &str {
        self.backend.base_url()
    }

    /// True while a request is waiting for the backend
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Run one upload attempt
    ///
    /// `Err` only for rejections (no file, already busy); the page is left
    /// untouched in both cases. Backend failures are rendered into the view
    /// and reported as `UploadOutcome::Failed`.
    pub async fn submit(&self, upload: Option<AudioUpload>) -> Result<UploadOutcome, UploadError> {
        let upload = upload.ok_or_else(|| UploadError::Validation(NO_FILE_MESSAGE.to_string()))?;

        let _guard = self.in_flight.try_lock().map_err(|_| {
            warn!(file = %upload.file_name, "Upload rejected: another upload is in flight");
            UploadError::InFlight
        })?;

        let upload_id = Uuid::new_v4();
        info!(
            %upload_id,
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "Starting upload"
        );

        self.view.write().await.begin_upload(upload_id, &upload.file_name);
        self.event_bus.emit_lossy(ViewEvent::UploadStarted {
            upload_id,
            file_name: upload.file_name.clone(),
            timestamp: Utc::now(),
        });

        let ticker = ProgressTicker::start(
            self.progress,
            upload_id,
            self.view.clone(),
            self.event_bus.clone(),
        );

        let response = self.backend.upload(&upload).await;

        // Ticker is gone before any terminal state is rendered
        ticker.stop().await;

        let result = response.and_then(|r| r.into_result());
        match result {
            Ok(result) => {
                let summary = result.summary().clone();
                let stem_count = result.stem_count();
                {
                    let mut view = self.view.write().await;
                    view.set_progress(upload_id, 100);
                    view.complete(upload_id, &result, self.backend.base_url());
                }

                self.event_bus.emit_lossy(ViewEvent::ProgressUpdated {
                    upload_id,
                    percent: 100,
                    timestamp: Utc::now(),
                });
                self.event_bus.emit_lossy(ViewEvent::UploadCompleted {
                    upload_id,
                    audio_type: summary.audio_type.clone(),
                    is_monophonic: result.is_monophonic(),
                    stem_count,
                    timestamp: Utc::now(),
                });
                info!(
                    %upload_id,
                    audio_type = %summary.audio_type,
                    monophonic = result.is_monophonic(),
                    stem_count,
                    "Upload completed"
                );

                Ok(UploadOutcome::Completed {
                    upload_id,
                    summary,
                    stem_count,
                })
            }
            Err(err) => {
                match &err {
                    UploadError::Decode(msg) => {
                        warn!(%upload_id, "Backend response could not be decoded: {}", msg)
                    }
                    other => error!(%upload_id, kind = other.kind(), "Upload failed: {}", other),
                }

                let message = err.to_string();
                self.view.write().await.fail(upload_id, message.clone());
                self.event_bus.emit_lossy(ViewEvent::UploadFailed {
                    upload_id,
                    message,
                    timestamp: Utc::now(),
                });

                Ok(UploadOutcome::Failed {
                    upload_id,
                    error: err,
                })
            }
        }
    }

    /// Flip the disclosure panel of `stem` in the current results
    ///
    /// `None` when there are no stem results or the stem has no panel.
    pub async fn toggle_stem(&self, stem: &str) -> Option<ToggleOutcome> {
        let outcome = {
            let mut view = self.view.write().await;
            let panel = view.toggle_stem(stem)?;
            ToggleOutcome {
                stem: stem.to_string(),
                state: panel.state(),
                button_label: panel.button_label(),
                panel_html: panel.render_panel(),
            }
        };

        self.event_bus.emit_lossy(ViewEvent::DisclosureToggled {
            stem: outcome.stem.clone(),
            expanded: outcome.state == DisclosureState::Expanded,
            timestamp: Utc::now(),
        });
        Some(outcome)
    }

    pub async fn status_html(&self) -> String {
        self.view.read().await.status_html()
    }

    pub async fn results_html(&self) -> String {
        self.view.read().await.results_html()
    }

    /// Standalone report for the current view
    pub async fn render_report(&self, source_name: &str) -> String {
        render_report(&*self.view.read().await, source_name)
    }
}
