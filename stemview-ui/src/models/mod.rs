//! Data model for the analysis backend contract

pub mod classification;
pub mod ordered_map;

pub use classification::{
    AnalysisResult, AudioTypeSummary, ClassificationResponse, InstrumentInfo, MonophonicResult,
    NoteData, NoteSegment, PitchData, PitchPoint, PolyphonicResult, TempoData,
};
pub use ordered_map::OrderedMap;
