//! Page view model
//!
//! The page has two regions: the status region (progress, summary or error)
//! and the results region. [`PageView`] is the single owner of both; the
//! current [`ResultsPanel`] owns the disclosure state of its stems.

use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AnalysisResult, AudioTypeSummary};
use crate::render::html::escape;
use crate::render::{render_monophonic, render_stems, DisclosurePanel, StemsPanel};

pub mod page;

pub use page::{render_page, render_report};

/// View shared between the controller, the progress ticker and handlers
pub type SharedView = Arc<RwLock<PageView>>;

/// Status region contents
#[derive(Debug, Clone, PartialEq)]
pub enum StatusRegion {
    Idle,
    Processing {
        upload_id: Uuid,
        file_name: String,
        percent: u8,
    },
    Completed {
        upload_id: Uuid,
        summary: AudioTypeSummary,
    },
    Failed {
        upload_id: Uuid,
        message: String,
    },
}

impl StatusRegion {
    /// Progress bar position, when a bar is shown
    pub fn percent(&self) -> Option<u8> {
        match self {
            StatusRegion::Processing { percent, .. } => Some(*percent),
            StatusRegion::Completed { .. } => Some(100),
            _ => None,
        }
    }

    pub fn render_html(&self) -> String {
        match self {
            StatusRegion::Idle => {
                r#"<span class="status-idle">Choose an audio file and press Upload.</span>"#
                    .to_string()
            }
            StatusRegion::Processing {
                file_name, percent, ..
            } => format!(
                r#"<span>Processing audio...</span>
<br>
<small>Analyzing audio type and detecting instruments in {}...</small>
<div class="progress-track"><div id="progressBar" class="progress-bar" style="width: {}%;"></div></div>"#,
                escape(file_name),
                percent
            ),
            StatusRegion::Completed { summary, .. } => format!(
                "✅ Audio type: <strong>{}</strong>, Confidence: <strong>{}</strong>",
                escape(&summary.audio_type),
                summary.confidence_text()
            ),
            StatusRegion::Failed { message, .. } => {
                format!("❌ Error: {}", escape(message))
            }
        }
    }
}

/// Results region contents for one response
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsPanel {
    Monophonic { html: String },
    Stems(StemsPanel),
}

impl ResultsPanel {
    pub fn from_result(result: &AnalysisResult, base_url: &str) -> Self {
        match result {
            AnalysisResult::Monophonic(r) => ResultsPanel::Monophonic {
                html: render_monophonic(r, base_url),
            },
            AnalysisResult::Polyphonic(r) => ResultsPanel::Stems(render_stems(r, base_url)),
        }
    }

    pub fn render_html(&self) -> String {
        match self {
            ResultsPanel::Monophonic { html } => html.clone(),
            ResultsPanel::Stems(panel) => panel.render_html(),
        }
    }

    pub fn stems(&self) -> Option<&StemsPanel> {
        match self {
            ResultsPanel::Stems(panel) => Some(panel),
            ResultsPanel::Monophonic { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    status: StatusRegion,
    results: Option<ResultsPanel>,
}

impl Default for PageView {
    fn default() -> Self {
        Self::new()
    }
}

impl PageView {
    pub fn new() -> Self {
        Self {
            status: StatusRegion::Idle,
            results: None,
        }
    }

    pub fn shared() -> SharedView {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn status(&self) -> &StatusRegion {
        &self.status
    }

    pub fn results(&self) -> Option<&ResultsPanel> {
        self.results.as_ref()
    }

    /// Show the processing indicator and drop the previous results
    pub fn begin_upload(&mut self, upload_id: Uuid, file_name: &str) {
        self.status = StatusRegion::Processing {
            upload_id,
            file_name: file_name.to_string(),
            percent: 0,
        };
        self.results = None;
    }

    /// Move the bar of the given upload; ignored once that upload is terminal
    pub fn set_progress(&mut self, upload_id: Uuid, percent: u8) -> bool {
        match &mut self.status {
            StatusRegion::Processing {
                upload_id: current,
                percent: p,
                ..
            } if *current == upload_id => {
                *p = percent.min(100);
                true
            }
            _ => false,
        }
    }

    /// Replace the whole results region with a new response
    pub fn complete(&mut self, upload_id: Uuid, result: &AnalysisResult, base_url: &str) {
        self.status = StatusRegion::Completed {
            upload_id,
            summary: result.summary().clone(),
        };
        self.results = Some(ResultsPanel::from_result(result, base_url));
    }

    /// Error state; the results region stays as cleared by `begin_upload`
    pub fn fail(&mut self, upload_id: Uuid, message: impl Into<String>) {
        self.status = StatusRegion::Failed {
            upload_id,
            message: message.into(),
        };
    }

    /// Flip a stem's disclosure panel in the current results
    pub fn toggle_stem(&mut self, stem: &str) -> Option<&DisclosurePanel> {
        match self.results.as_mut() {
            Some(ResultsPanel::Stems(panel)) => {
                panel.toggle(stem)?;
                panel.disclosure(stem)
            }
            _ => None,
        }
    }

    pub fn status_html(&self) -> String {
        self.status.render_html()
    }

    pub fn results_html(&self) -> String {
        self.results
            .as_ref()
            .map(ResultsPanel::render_html)
            .unwrap_or_default()
    }
}
