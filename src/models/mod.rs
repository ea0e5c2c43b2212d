//! Records exchanged with the meeting service.
//!
//! All identifiers are opaque numeric handles assigned by the server.

pub mod meeting;
pub mod report;
pub mod task;
pub mod transcript;

pub use meeting::{Meeting, MeetingId, NewMeeting, Participant, ParticipantId, ParticipantUpdate, StatusProbe};
pub use report::{ProgressReport, ReportId, ReportRequest, ReportType};
pub use task::{Task, TaskId, TaskPriority, TaskStatus, TaskUpdate};
pub use transcript::{Summary, Transcript, TranscriptSegment};
