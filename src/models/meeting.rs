use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::meeting::MeetingStatus;

pub type MeetingId = i64;
pub type ParticipantId = i64;

/// A meeting as the server reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub duration_seconds: Option<i64>,
    pub status: MeetingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Only populated by the single-meeting fetch.
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Meeting {
    /// Duration rounded to whole minutes, as shown in listings.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.duration_seconds
            .map(|secs| (secs as f64 / 60.0).round() as i64)
    }
}

/// Body of `POST /meetings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMeeting {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
}

/// Response of the lightweight `GET /meetings/{id}/status` probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusProbe {
    pub status: MeetingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub email: Option<String>,
    pub speaker_label: Option<String>,
}

/// Body of `PUT /meetings/{id}/participants/{pid}`; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
