//! Classification response contract
//!
//! Shape of the JSON returned by `POST /upload/` on the analysis backend.
//! The payload is flat: `is_monophonic` decides which of the optional
//! sections are meaningful. [`ClassificationResponse::into_result`] turns it
//! into the tagged [`AnalysisResult`] the renderer works with.

use serde::{Deserialize, Serialize};

use super::ordered_map::OrderedMap;
use crate::error::UploadError;

/// Raw backend response, received once per upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    /// Coarse audio-type label ("monophonic", "polyphonic", ...)
    #[serde(rename = "type")]
    pub audio_type: String,

    /// Classifier confidence for `audio_type` (0.0 to 1.0)
    #[serde(default)]
    pub confidence: Option<f64>,

    pub is_monophonic: bool,

    /// Free-text summary from the backend ("Processing complete")
    #[serde(default)]
    pub message: Option<String>,

    // === Monophonic branch ===
    #[serde(default)]
    pub instrument: Option<InstrumentInfo>,

    #[serde(default)]
    pub pitch_data: Option<PitchData>,

    #[serde(default)]
    pub note_data: Option<NoteData>,

    #[serde(default)]
    pub tempo_data: Option<TempoData>,

    /// Backend-relative URL of the uploaded original
    #[serde(default)]
    pub audio_file: Option<String>,

    // === Polyphonic branch ===
    /// Stem name → backend-relative audio URL
    #[serde(default)]
    pub stems: Option<OrderedMap<String>>,

    /// Stem name → detected instruments, best first
    #[serde(default)]
    pub instruments: Option<OrderedMap<Vec<InstrumentInfo>>>,
}

/// One detected instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentInfo {
    /// Machine name, e.g. "acoustic_guitar"
    pub instrument: String,
    pub confidence: f64,
    pub category: String,
    #[serde(default)]
    pub characteristics: Option<String>,
    /// Detector that produced the entry ("yamnet", "fallback", ...)
    #[serde(default)]
    pub source: Option<String>,
}

impl InstrumentInfo {
    /// Characteristics text, if it carries anything worth showing
    pub fn characteristics_text(&self) -> Option<&str> {
        self.characteristics
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchPoint {
    /// Seconds from start of file
    pub time: f64,
    /// Hz
    pub frequency: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchData {
    #[serde(default)]
    pub sample_rate: Option<f64>,
    #[serde(default)]
    pub pitch_points: Option<Vec<PitchPoint>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteSegment {
    pub start: f64,
    pub end: f64,
    /// Hz
    pub pitch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteData {
    #[serde(default)]
    pub notes: Option<Vec<NoteSegment>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoData {
    /// Beats per minute
    pub tempo: f64,
    #[serde(default)]
    pub beats: Vec<f64>,
    #[serde(default)]
    pub beat_count: Option<u64>,
    #[serde(default)]
    pub mean_beat_interval: Option<f64>,
    #[serde(default)]
    pub beat_interval_std: Option<f64>,
}

impl TempoData {
    pub fn beat_count(&self) -> u64 {
        self.beat_count.unwrap_or(self.beats.len() as u64)
    }
}

/// Summary shared by both branches, shown in the status region
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTypeSummary {
    pub audio_type: String,
    pub confidence: Option<f64>,
}

impl AudioTypeSummary {
    /// Confidence with two decimals, or "N/A"
    pub fn confidence_text(&self) -> String {
        match self.confidence {
            Some(c) if c.is_finite() => format!("{:.2}", c),
            _ => "N/A".to_string(),
        }
    }
}

/// Single-instrument result
#[derive(Debug, Clone, PartialEq)]
pub struct MonophonicResult {
    pub summary: AudioTypeSummary,
    pub instrument: InstrumentInfo,
    pub pitch_data: Option<PitchData>,
    pub note_data: Option<NoteData>,
    pub tempo_data: Option<TempoData>,
    pub audio_file: Option<String>,
}

impl MonophonicResult {
    pub fn pitch_points(&self) -> Option<&[PitchPoint]> {
        self.pitch_data
            .as_ref()
            .and_then(|p| p.pitch_points.as_deref())
    }

    pub fn notes(&self) -> Option<&[NoteSegment]> {
        self.note_data.as_ref().and_then(|n| n.notes.as_deref())
    }
}

/// Stem separation result
#[derive(Debug, Clone, PartialEq)]
pub struct PolyphonicResult {
    pub summary: AudioTypeSummary,
    pub stems: OrderedMap<String>,
    pub instruments: OrderedMap<Vec<InstrumentInfo>>,
}

/// Validated response, one variant per rendering branch
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Monophonic(MonophonicResult),
    Polyphonic(PolyphonicResult),
}

impl AnalysisResult {
    pub fn summary(&self) -> &AudioTypeSummary {
        match self {
            AnalysisResult::Monophonic(r) => &r.summary,
            AnalysisResult::Polyphonic(r) => &r.summary,
        }
    }

    pub fn is_monophonic(&self) -> bool {
        matches!(self, AnalysisResult::Monophonic(_))
    }

    pub fn stem_count(&self) -> usize {
        match self {
            AnalysisResult::Monophonic(_) => 0,
            AnalysisResult::Polyphonic(r) => r.stems.len(),
        }
    }
}

impl ClassificationResponse {
    /// Validate the branch-specific shape
    ///
    /// A monophonic payload must carry `instrument`; a polyphonic payload with
    /// no `stems` renders as zero cards.
    pub fn into_result(self) -> Result<AnalysisResult, UploadError> {
        let summary = AudioTypeSummary {
            audio_type: self.audio_type,
            confidence: self.confidence,
        };

        if self.is_monophonic {
            let instrument = self.instrument.ok_or_else(|| {
                UploadError::Decode(
                    "monophonic response is missing the 'instrument' section".to_string(),
                )
            })?;
            Ok(AnalysisResult::Monophonic(MonophonicResult {
                summary,
                instrument,
                pitch_data: self.pitch_data,
                note_data: self.note_data,
                tempo_data: self.tempo_data,
                audio_file: self.audio_file,
            }))
        } else {
            Ok(AnalysisResult::Polyphonic(PolyphonicResult {
                summary,
                stems: self.stems.unwrap_or_default(),
                instruments: self.instruments.unwrap_or_default(),
            }))
        }
    }
}
