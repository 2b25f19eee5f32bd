//! Disclosure panels for per-stem instrument detail
//!
//! Each toggle-able stem owns one [`DisclosurePanel`]:
//!
//! ```text
//! Collapsed --toggle--> Expanded --toggle--> Collapsed ...
//! ```
//!
//! Content is built on the first transition to `Expanded` and kept
//! afterwards; collapsing only hides it. Panels are independent of each other
//! and die with the results panel that created them.

use super::html::escape;
use super::instrument::{render_instrument_detail, DetailStyle};
use crate::models::InstrumentInfo;

pub const SHOW_LABEL: &str = "🔍 View Detected Instruments";
pub const HIDE_LABEL: &str = "🔼 Hide Instruments";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisclosureState {
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisclosurePanel {
    stem: String,
    state: DisclosureState,
    content: Option<String>,
}

impl DisclosurePanel {
    pub fn new(stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            state: DisclosureState::Collapsed,
            content: None,
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn state(&self) -> DisclosureState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == DisclosureState::Expanded
    }

    /// Whether the detail content has been built yet
    pub fn is_built(&self) -> bool {
        self.content.is_some()
    }

    /// Flip the panel; `instruments` is only read on the first expand
    pub fn toggle(&mut self, instruments: &[InstrumentInfo]) -> DisclosureState {
        self.state = match self.state {
            DisclosureState::Collapsed => {
                if self.content.is_none() {
                    self.content = Some(build_content(&self.stem, instruments));
                }
                DisclosureState::Expanded
            }
            DisclosureState::Expanded => DisclosureState::Collapsed,
        };
        self.state
    }

    pub fn button_label(&self) -> &'static str {
        match self.state {
            DisclosureState::Collapsed => SHOW_LABEL,
            DisclosureState::Expanded => HIDE_LABEL,
        }
    }

    pub fn render_button(&self) -> String {
        format!(
            r#"<button type="button" class="disclosure-toggle" data-stem="{stem}" aria-expanded="{expanded}">{label}</button>"#,
            stem = escape(&self.stem),
            expanded = self.is_expanded(),
            label = self.button_label(),
        )
    }

    /// Panel container; hidden while collapsed, content kept once built
    pub fn render_panel(&self) -> String {
        let display = if self.is_expanded() { "block" } else { "none" };
        format!(
            r#"<div class="disclosure-panel" data-stem="{}" style="display: {};">{}</div>"#,
            escape(&self.stem),
            display,
            self.content.as_deref().unwrap_or_default(),
        )
    }
}

fn build_content(stem: &str, instruments: &[InstrumentInfo]) -> String {
    let body = if instruments.is_empty() {
        r#"<p class="no-instruments">No instruments detected in this stem.</p>"#.to_string()
    } else {
        instruments
            .iter()
            .map(|inst| render_instrument_detail(inst, DetailStyle::Disclosed))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<div class="disclosure-content">
    <h5>🎹 Detected Instruments in {} Stem:</h5>
    {}
</div>"#,
        escape(&stem.to_uppercase()),
        body
    )
}
