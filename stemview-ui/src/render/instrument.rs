//! Instrument detail blocks
//!
//! One [`InstrumentInfo`] renders in three places: the monophonic panel
//! (featured), directly inside a stem card (inline) and inside a disclosure
//! panel (disclosed, same layout as featured).

use super::html::escape;
use crate::models::InstrumentInfo;

/// Where an instrument detail block is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStyle {
    Featured,
    Inline,
    Disclosed,
}

impl DetailStyle {
    fn class(self) -> &'static str {
        match self {
            DetailStyle::Featured => "instrument instrument-featured",
            DetailStyle::Inline => "instrument instrument-inline",
            DetailStyle::Disclosed => "instrument instrument-disclosed",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            DetailStyle::Featured | DetailStyle::Inline => "🎸",
            DetailStyle::Disclosed => "🎵",
        }
    }
}

/// Display form of a machine instrument name
///
/// `_` and `-` separators become spaces and the result is upper-cased:
/// `acoustic_guitar` → `ACOUSTIC GUITAR`.
pub fn display_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>()
        .to_uppercase()
}

/// Confidence (0.0 to 1.0) as an integer percent
///
/// Out-of-range input is shown as-is; NaN shows as 0.
pub fn confidence_percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

pub fn render_instrument_detail(instrument: &InstrumentInfo, style: DetailStyle) -> String {
    let characteristics = match (instrument.characteristics_text(), style) {
        (None, _) => String::new(),
        (Some(text), DetailStyle::Inline) => {
            format!(r#"<div class="characteristics-inline">💡 {}</div>"#, escape(text))
        }
        (Some(text), _) => format!(
            r#"<div class="characteristics"><strong>💡 Characteristics:</strong><p>{}</p></div>"#,
            escape(text)
        ),
    };

    format!(
        r#"<div class="{class}">
    <div class="instrument-name">{icon} {name}</div>
    <div class="instrument-badges">
        <span class="badge badge-confidence">{percent}% Confidence</span>
        <span class="badge badge-category">{category}</span>
    </div>
    {characteristics}
</div>"#,
        class = style.class(),
        icon = style.icon(),
        name = escape(&display_name(&instrument.instrument)),
        percent = confidence_percent(instrument.confidence),
        category = escape(&instrument.category),
        characteristics = characteristics,
    )
}
