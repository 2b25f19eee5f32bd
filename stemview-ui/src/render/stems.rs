//! Separated stems panel
//!
//! One card per stem, in response order. Each card shows the stem name with
//! its icon and an audio player; instrument detail is placed according to the
//! stem's [`DetailPolicy`].

use super::disclosure::{DisclosurePanel, DisclosureState};
use super::html::escape;
use super::instrument::{render_instrument_detail, DetailStyle};
use crate::client::resolve_media_url;
use crate::models::{InstrumentInfo, OrderedMap, PolyphonicResult};

/// How a stem's instrument detail is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPolicy {
    /// First instrument entry rendered directly in the card
    InlineDetail,
    /// Toggle button revealing every entry on demand
    DisclosedDetail,
}

/// Per-stem presentation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StemProfile {
    pub name: &'static str,
    pub icon: &'static str,
    pub policy: DetailPolicy,
}

const STEM_PROFILES: &[StemProfile] = &[
    StemProfile {
        name: "drums",
        icon: "🥁",
        policy: DetailPolicy::InlineDetail,
    },
    StemProfile {
        name: "bass",
        icon: "🎸",
        policy: DetailPolicy::InlineDetail,
    },
    StemProfile {
        name: "vocals",
        icon: "🎤",
        policy: DetailPolicy::InlineDetail,
    },
    StemProfile {
        name: "other",
        icon: "🎹",
        policy: DetailPolicy::DisclosedDetail,
    },
];

pub const DEFAULT_STEM_ICON: &str = "🎵";

fn profile(stem: &str) -> Option<&'static StemProfile> {
    STEM_PROFILES.iter().find(|p| p.name == stem)
}

pub fn stem_icon(stem: &str) -> &'static str {
    profile(stem).map(|p| p.icon).unwrap_or(DEFAULT_STEM_ICON)
}

/// Unknown stems get inline detail
pub fn detail_policy(stem: &str) -> DetailPolicy {
    profile(stem)
        .map(|p| p.policy)
        .unwrap_or(DetailPolicy::InlineDetail)
}

#[derive(Debug, Clone, PartialEq)]
enum CardDetail {
    None,
    Inline(String),
    Disclosed,
}

#[derive(Debug, Clone, PartialEq)]
struct StemCard {
    name: String,
    media_url: String,
    detail: CardDetail,
}

/// Rendered polyphonic results plus the state its toggles need
///
/// Owns the instruments-by-stem table read by the disclosure toggles; a new
/// upload replaces the whole panel, so nothing leaks between results.
#[derive(Debug, Clone, PartialEq)]
pub struct StemsPanel {
    cards: Vec<StemCard>,
    instruments: OrderedMap<Vec<InstrumentInfo>>,
    disclosures: OrderedMap<DisclosurePanel>,
}

impl StemsPanel {
    /// Retained instruments, keyed by stem name
    pub fn instruments(&self) -> &OrderedMap<Vec<InstrumentInfo>> {
        &self.instruments
    }

    pub fn stem_names(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.name.as_str())
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn disclosure(&self, stem: &str) -> Option<&DisclosurePanel> {
        self.disclosures.get(stem)
    }

    pub fn has_disclosure(&self, stem: &str) -> bool {
        self.disclosures.contains_key(stem)
    }

    /// Flip a stem's disclosure panel; `None` when the stem has no toggle
    pub fn toggle(&mut self, stem: &str) -> Option<DisclosureState> {
        let panel = self.disclosures.get_mut(stem)?;
        let instruments = self
            .instruments
            .get(stem)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Some(panel.toggle(instruments))
    }

    /// Expand every collapsed panel (standalone reports have no server)
    pub fn expand_all(&mut self) {
        let names: Vec<String> = self.disclosures.keys().map(str::to_string).collect();
        for name in names {
            if self.disclosures.get(&name).map(|p| !p.is_expanded()).unwrap_or(false) {
                self.toggle(&name);
            }
        }
    }

    pub fn render_html(&self) -> String {
        let mut html = String::from(
            r#"<h3 class="section-title">🎼 Separated Stems</h3>"#,
        );
        for card in &self.cards {
            html.push('\n');
            html.push_str(&self.render_card(card));
        }
        html
    }

    fn render_card(&self, card: &StemCard) -> String {
        let detail = match &card.detail {
            CardDetail::None => String::new(),
            CardDetail::Inline(detail) => detail.clone(),
            CardDetail::Disclosed => self
                .disclosures
                .get(&card.name)
                .map(|p| format!("{}\n    {}", p.render_button(), p.render_panel()))
                .unwrap_or_default(),
        };

        format!(
            r#"<div class="stem-card" data-stem="{stem}">
    <h4 class="stem-title">{title} {icon}</h4>
    <audio controls class="stem-audio" src="{src}"></audio>
    {detail}
</div>"#,
            stem = escape(&card.name),
            title = escape(&card.name.to_uppercase()),
            icon = stem_icon(&card.name),
            src = escape(&card.media_url),
            detail = detail,
        )
    }
}

fn render_inline(instruments: &[InstrumentInfo]) -> String {
    match instruments.first() {
        Some(first) => render_instrument_detail(first, DetailStyle::Inline),
        None => r#"<p class="no-instruments">No instruments detected in this stem.</p>"#.to_string(),
    }
}

/// Build the stems panel; disclosure state is created here, collapsed
pub fn render_stems(result: &PolyphonicResult, base_url: &str) -> StemsPanel {
    let mut disclosures = OrderedMap::new();

    let cards = result
        .stems
        .iter()
        .map(|(name, url)| {
            let detail = match result.instruments.get(name) {
                None => CardDetail::None,
                Some(list) => match detail_policy(name) {
                    DetailPolicy::InlineDetail => CardDetail::Inline(render_inline(list)),
                    DetailPolicy::DisclosedDetail => {
                        disclosures.insert(name, DisclosurePanel::new(name));
                        CardDetail::Disclosed
                    }
                },
            };

            StemCard {
                name: name.to_string(),
                media_url: resolve_media_url(base_url, url),
                detail,
            }
        })
        .collect();

    StemsPanel {
        cards,
        instruments: result.instruments.clone(),
        disclosures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AudioTypeSummary;

    fn inst(name: &str) -> InstrumentInfo {
        InstrumentInfo {
            instrument: name.to_string(),
            confidence: 0.75,
            category: "melodic".to_string(),
            characteristics: None,
            source: None,
        }
    }

    fn result(stems: &[&str], instruments: Vec<(&str, Vec<InstrumentInfo>)>) -> PolyphonicResult {
        PolyphonicResult {
            summary: AudioTypeSummary {
                audio_type: "polyphonic".to_string(),
                confidence: Some(0.9),
            },
            stems: stems
                .iter()
                .map(|s| (s.to_string(), format!("/stems/{}.wav", s)))
                .collect(),
            instruments: instruments.into_iter().collect(),
        }
    }

    #[test]
    fn test_icons_and_default() {
        assert_eq!(stem_icon("drums"), "🥁");
        assert_eq!(stem_icon("bass"), "🎸");
        assert_eq!(stem_icon("vocals"), "🎤");
        assert_eq!(stem_icon("other"), "🎹");
        assert_eq!(stem_icon("keys"), DEFAULT_STEM_ICON);
    }

    #[test]
    fn test_policy_table() {
        assert_eq!(detail_policy("other"), DetailPolicy::DisclosedDetail);
        assert_eq!(detail_policy("bass"), DetailPolicy::InlineDetail);
        assert_eq!(detail_policy("keys"), DetailPolicy::InlineDetail);
    }

    #[test]
    fn test_empty_stems_render_header_only() {
        let panel = render_stems(&result(&[], vec![]), "http://h");
        assert_eq!(panel.card_count(), 0);
        let html = panel.render_html();
        assert!(html.contains("Separated Stems"));
        assert!(!html.contains("stem-card"));
    }

    #[test]
    fn test_cards_follow_response_order_and_resolve_urls() {
        let panel = render_stems(&result(&["vocals", "drums", "keys"], vec![]), "http://127.0.0.1:8000");
        let names: Vec<&str> = panel.stem_names().collect();
        assert_eq!(names, vec!["vocals", "drums", "keys"]);

        let html = panel.render_html();
        assert!(html.contains(r#"src="http://127.0.0.1:8000/stems/drums.wav""#));
        assert!(html.contains("KEYS 🎵"));
        assert!(html.find("VOCALS").unwrap() < html.find("DRUMS").unwrap());
    }

    #[test]
    fn test_inline_stem_shows_first_instrument_without_toggle() {
        let panel = render_stems(
            &result(&["bass"], vec![("bass", vec![inst("electric_bass"), inst("synth_bass")])]),
            "http://h",
        );
        let html = panel.render_html();
        assert!(html.contains("ELECTRIC BASS"));
        assert!(!html.contains("SYNTH BASS"));
        assert!(!html.contains("disclosure-toggle"));
        assert!(!panel.has_disclosure("bass"));
    }

    #[test]
    fn test_other_stem_gets_collapsed_toggle() {
        let mut panel = render_stems(
            &result(&["other"], vec![("other", vec![inst("piano"), inst("organ")])]),
            "http://h",
        );
        let html = panel.render_html();
        assert!(html.contains("disclosure-toggle"));
        assert!(html.contains("display: none;"));
        assert!(!html.contains("PIANO"));

        assert_eq!(panel.toggle("other"), Some(DisclosureState::Expanded));
        let html = panel.render_html();
        assert!(html.find("PIANO").unwrap() < html.find("ORGAN").unwrap());

        assert_eq!(panel.toggle("other"), Some(DisclosureState::Collapsed));
        assert!(panel.render_html().contains("display: none;"));
        assert_eq!(panel.toggle("bass"), None);
    }

    #[test]
    fn test_stem_without_instruments_entry_has_no_detail() {
        let panel = render_stems(&result(&["other"], vec![]), "http://h");
        assert!(!panel.has_disclosure("other"));
        assert!(!panel.render_html().contains("disclosure-toggle"));
    }

    #[test]
    fn test_expand_all() {
        let mut panel = render_stems(
            &result(&["other"], vec![("other", vec![inst("piano")])]),
            "http://h",
        );
        panel.expand_all();
        assert!(panel.disclosure("other").unwrap().is_expanded());
        panel.expand_all();
        assert!(panel.disclosure("other").unwrap().is_expanded());
    }
}
