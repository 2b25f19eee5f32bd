//! Single-instrument results panel
//!
//! Instrument panel first, then the pitch preview table and the note table.
//! The two tables are independent: either, both or neither may appear.

use super::html::escape;
use super::instrument::{confidence_percent, render_instrument_detail, DetailStyle};
use crate::client::resolve_media_url;
use crate::models::{MonophonicResult, NoteSegment, PitchPoint, TempoData};

/// Rows shown in the pitch preview table
pub const PITCH_PREVIEW_ROWS: usize = 20;

pub fn render_monophonic(result: &MonophonicResult, base_url: &str) -> String {
    let mut html = format!(
        r#"<div class="panel mono-panel">
    <h3 class="panel-title">🎵 Monophonic Audio Detected</h3>
    <div class="mono-highlight">
        <p class="mono-intro">This audio contains a <strong>single instrument</strong>. No need for stem separation!</p>
        {detail}
    </div>
    {original}{tempo}
    <div class="note-box">
        <strong>ℹ️ Note:</strong>
        <p>Monophonic audio doesn't require stem separation. The entire audio is from this single instrument.</p>
    </div>
</div>"#,
        detail = render_instrument_detail(&result.instrument, DetailStyle::Featured),
        original = render_original_audio(result.audio_file.as_deref(), base_url),
        tempo = result.tempo_data.as_ref().map(render_tempo).unwrap_or_default(),
    );

    if let Some(points) = result.pitch_points() {
        let sample_rate = result.pitch_data.as_ref().and_then(|p| p.sample_rate);
        html.push_str(&render_pitch_table(points, sample_rate));
    }

    if let Some(notes) = result.notes() {
        html.push_str(&render_note_table(notes));
    }

    html
}

fn render_original_audio(audio_file: Option<&str>, base_url: &str) -> String {
    match audio_file.map(str::trim).filter(|f| !f.is_empty()) {
        Some(path) => format!(
            r#"<audio controls class="original-audio" src="{}"></audio>"#,
            escape(&resolve_media_url(base_url, path))
        ),
        None => String::new(),
    }
}

fn render_tempo(tempo: &TempoData) -> String {
    let interval = tempo
        .mean_beat_interval
        .map(|i| format!(", mean beat interval {:.2} s", i))
        .unwrap_or_default();
    format!(
        r#"<div class="tempo-box"><strong>🥁 Tempo:</strong> {:.1} BPM ({} beats{})</div>"#,
        tempo.tempo,
        tempo.beat_count(),
        interval
    )
}

/// Pitch preview table; omitted when there are no points
pub fn render_pitch_table(points: &[PitchPoint], sample_rate: Option<f64>) -> String {
    if points.is_empty() {
        return String::new();
    }

    let rows: String = points
        .iter()
        .take(PITCH_PREVIEW_ROWS)
        .map(|p| {
            format!(
                r#"<tr class="pitch-row"><td>{:.2}</td><td>{:.1}</td><td>{}%</td></tr>"#,
                p.time,
                p.frequency,
                confidence_percent(p.confidence)
            )
        })
        .collect();

    let mut caption = if points.len() > PITCH_PREVIEW_ROWS {
        format!(
            "Showing first {} of {} pitch points",
            PITCH_PREVIEW_ROWS,
            points.len()
        )
    } else {
        format!("Showing all {} pitch points", points.len())
    };
    if let Some(rate) = sample_rate.filter(|r| r.is_finite() && *r > 0.0) {
        caption.push_str(&format!(" (sample rate {:.0} Hz)", rate));
    }

    format!(
        r#"<div class="panel data-panel pitch-panel">
    <h4>🎼 Extracted Pitch Values (Hz)</h4>
    <table class="data-table">
        <thead><tr><th>Time (s)</th><th>Frequency (Hz)</th><th>Confidence</th></tr></thead>
        <tbody>{}</tbody>
    </table>
    <p class="table-caption">{}</p>
</div>"#,
        rows, caption
    )
}

/// Note segment table; every segment is listed, omitted when empty
pub fn render_note_table(notes: &[NoteSegment]) -> String {
    if notes.is_empty() {
        return String::new();
    }

    let rows: String = notes
        .iter()
        .map(|n| {
            format!(
                r#"<tr class="note-row"><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>"#,
                n.start, n.end, n.pitch
            )
        })
        .collect();

    format!(
        r#"<div class="panel data-panel notes-panel">
    <h4>🎶 Detected Notes</h4>
    <table class="data-table">
        <thead><tr><th>Start (s)</th><th>End (s)</th><th>Pitch (Hz)</th></tr></thead>
        <tbody>{}</tbody>
    </table>
    <p class="table-caption">Showing all detected note segments</p>
</div>"#,
        rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AudioTypeSummary, InstrumentInfo, NoteData, PitchData};

    fn pitch_points(n: usize) -> Vec<PitchPoint> {
        (0..n)
            .map(|i| PitchPoint {
                time: i as f64 * 0.01,
                frequency: 440.04 + i as f64,
                confidence: 0.934,
            })
            .collect()
    }

    fn notes(n: usize) -> Vec<NoteSegment> {
        (0..n)
            .map(|i| NoteSegment {
                start: i as f64 * 0.5,
                end: i as f64 * 0.5 + 0.25,
                pitch: 261.626,
            })
            .collect()
    }

    fn result(points: Option<Vec<PitchPoint>>, note_list: Option<Vec<NoteSegment>>) -> MonophonicResult {
        MonophonicResult {
            summary: AudioTypeSummary {
                audio_type: "monophonic".to_string(),
                confidence: Some(0.8),
            },
            instrument: InstrumentInfo {
                instrument: "acoustic_guitar".to_string(),
                confidence: 0.87,
                category: "string instrument".to_string(),
                characteristics: Some("Plucked strings".to_string()),
                source: None,
            },
            pitch_data: points.map(|p| PitchData {
                sample_rate: None,
                pitch_points: Some(p),
            }),
            note_data: note_list.map(|n| NoteData { notes: Some(n) }),
            tempo_data: None,
            audio_file: None,
        }
    }

    #[test]
    fn test_instrument_panel() {
        let html = render_monophonic(&result(None, None), "http://h");
        assert!(html.contains("Monophonic Audio Detected"));
        assert!(html.contains("ACOUSTIC GUITAR"));
        assert!(html.contains("87% Confidence"));
        assert!(html.contains("string instrument"));
        assert!(html.contains("Plucked strings"));
        assert!(!html.contains("pitch-panel"));
        assert!(!html.contains("notes-panel"));
    }

    #[test]
    fn test_pitch_table_truncates_to_20() {
        let html = render_pitch_table(&pitch_points(25), None);
        assert_eq!(html.matches(r#"class="pitch-row""#).count(), 20);
        assert!(html.contains("<td>440.0</td>"));
        assert!(html.contains("<td>93%</td>"));
        assert!(html.contains("Showing first 20 of 25 pitch points"));
    }

    #[test]
    fn test_pitch_table_short_renders_all() {
        let html = render_pitch_table(&pitch_points(5), Some(16000.0));
        assert_eq!(html.matches(r#"class="pitch-row""#).count(), 5);
        assert!(html.contains("Showing all 5 pitch points (sample rate 16000 Hz)"));
    }

    #[test]
    fn test_note_table_renders_every_note() {
        for n in [1usize, 50] {
            let html = render_monophonic(&result(None, Some(notes(n))), "http://h");
            assert_eq!(html.matches(r#"class="note-row""#).count(), n);
            assert!(html.contains("<td>261.63</td>"));
            assert!(html.contains("Showing all detected note segments"));
        }
    }

    #[test]
    fn test_zero_notes_omits_section() {
        let html = render_monophonic(&result(None, Some(Vec::new())), "http://h");
        assert!(!html.contains("notes-panel"));
        assert!(!html.contains("Detected Notes"));
    }

    #[test]
    fn test_tables_are_independent() {
        let both = render_monophonic(&result(Some(pitch_points(3)), Some(notes(2))), "http://h");
        assert!(both.contains("pitch-panel") && both.contains("notes-panel"));

        let pitch_only = render_monophonic(&result(Some(pitch_points(3)), None), "http://h");
        assert!(pitch_only.contains("pitch-panel") && !pitch_only.contains("notes-panel"));
    }

    #[test]
    fn test_original_audio_and_tempo() {
        let mut r = result(None, None);
        r.audio_file = Some("/uploads/take.wav".to_string());
        r.tempo_data = Some(TempoData {
            tempo: 120.0,
            beats: vec![0.5, 1.0],
            beat_count: None,
            mean_beat_interval: Some(0.5),
            beat_interval_std: None,
        });
        let html = render_monophonic(&r, "http://127.0.0.1:8000");
        assert!(html.contains(r#"src="http://127.0.0.1:8000/uploads/take.wav""#));
        assert!(html.contains("120.0 BPM (2 beats, mean beat interval 0.50 s)"));
    }
}
