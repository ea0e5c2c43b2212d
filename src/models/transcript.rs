use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::MeetingId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub id: i64,
    pub speaker_label: String,
    pub participant_name: Option<String>,
    /// Offset from the start of the recording, in seconds.
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    pub confidence: Option<f64>,
    pub segment_order: i64,
}

impl TranscriptSegment {
    /// Resolved participant name, or the raw diarization label.
    pub fn speaker(&self) -> &str {
        self.participant_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.speaker_label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub meeting_id: MeetingId,
    pub segments: Vec<TranscriptSegment>,
    #[serde(default)]
    pub full_text: String,
}

impl Transcript {
    /// Put segments in `segment_order`; the server already does, but nothing
    /// downstream should depend on that.
    pub fn normalize(mut self) -> Self {
        self.segments.sort_by_key(|s| s.segment_order);
        self
    }

    /// Distinct speakers in order of first appearance.
    pub fn speakers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for segment in &self.segments {
            let speaker = segment.speaker();
            if !seen.contains(&speaker) {
                seen.push(speaker);
            }
        }
        seen
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub id: i64,
    pub meeting_id: MeetingId,
    pub full_summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    pub created_at: NaiveDateTime,
}
