use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped, speaker-attributed span of transcribed speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    /// Unique segment identifier (generated on load if the backend omitted one)
    #[serde(default)]
    pub id: String,

    /// Speaker name or diarization label, if available
    #[serde(default)]
    pub speaker: Option<String>,

    /// Transcribed text
    pub text: String,

    /// Start of the segment in seconds from the beginning of the recording
    #[serde(alias = "start")]
    pub start_time: f64,

    /// End of the segment in seconds
    #[serde(alias = "end")]
    pub end_time: f64,

    /// Confidence score (0.0 to 1.0), if the STT backend provides one
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl TranscriptSegment {
    /// Whether `time` falls inside this segment's half-open interval
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    /// Segment length in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// The transcript resource for one meeting
///
/// Fetched once when a meeting view opens and held read-only for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptDocument {
    /// Meeting this transcript belongs to
    pub meeting_id: String,

    /// Human-readable meeting title, if known
    #[serde(default)]
    pub title: Option<String>,

    /// When the meeting was recorded
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,

    /// Ordered transcript segments
    pub segments: Vec<TranscriptSegment>,
}
