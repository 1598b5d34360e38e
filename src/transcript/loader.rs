use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use super::segment::{TranscriptDocument, TranscriptSegment};

/// Transcript payload shapes accepted from the backend
///
/// The API returns a document object; older exports are bare segment arrays.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTranscript {
    Document(TranscriptDocument),
    Segments(Vec<TranscriptSegment>),
}

/// Parse a transcript resource from JSON
///
/// Accepts either a full document or a bare segment array, normalizes the
/// segments (drops degenerate intervals, fills missing ids), and returns the
/// document ready for indexing.
pub fn parse_transcript(json: &str) -> Result<TranscriptDocument> {
    let raw: RawTranscript =
        serde_json::from_str(json).context("Failed to parse transcript JSON")?;

    let mut doc = match raw {
        RawTranscript::Document(doc) => doc,
        RawTranscript::Segments(segments) => TranscriptDocument {
            meeting_id: format!("meeting-{}", Uuid::new_v4()),
            title: None,
            recorded_at: None,
            segments,
        },
    };

    doc.segments = normalize_segments(doc.segments);
    Ok(doc)
}

/// Load a transcript document from a JSON file
pub fn load_transcript(path: impl AsRef<Path>) -> Result<TranscriptDocument> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript file: {}", path.display()))?;

    let doc = parse_transcript(&json)?;
    info!(
        "Loaded transcript for {}: {} segments",
        doc.meeting_id,
        doc.segments.len()
    );

    Ok(doc)
}

/// Drop unusable intervals and fill missing segment ids
fn normalize_segments(segments: Vec<TranscriptSegment>) -> Vec<TranscriptSegment> {
    let mut normalized = Vec::with_capacity(segments.len());

    for mut segment in segments {
        let valid_interval = segment.start_time.is_finite()
            && segment.end_time.is_finite()
            && segment.start_time < segment.end_time;
        if !valid_interval {
            warn!(
                "Dropping malformed segment interval {:.3}s - {:.3}s",
                segment.start_time, segment.end_time
            );
            continue;
        }

        if segment.id.is_empty() {
            segment.id = Uuid::new_v4().to_string();
        }

        normalized.push(segment);
    }

    normalized
}
