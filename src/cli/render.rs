//! Plain-text rendering for CLI output.

use chrono::NaiveDateTime;

use crate::meeting::MeetingStatus;
use crate::models::{Meeting, Participant, ProgressReport, Summary, Task, TranscriptSegment};
use crate::tasks::TaskBoard;

/// Seconds as `mm:ss`; minutes keep counting past the hour.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

pub fn meeting_row(meeting: &Meeting) -> String {
    let duration = meeting
        .duration_minutes()
        .map(|m| format!("{} min", m))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "#{} {} [{}] {} ({})",
        meeting.id,
        meeting.title,
        meeting.status.label(),
        format_date(&meeting.date),
        duration
    )
}

/// What to tell the user when the pipeline gave up.
pub fn failure_hint(meeting: &Meeting) -> Option<String> {
    (meeting.status == MeetingStatus::Failed).then(|| {
        format!(
            "Processing failed. Upload the recording again with: meeting-assistant meetings upload {} <file>",
            meeting.id
        )
    })
}

pub fn meeting_details(meeting: &Meeting) -> String {
    let mut lines = vec![
        format!("Meeting #{}: {}", meeting.id, meeting.title),
        format!("Status: {}", meeting.status.label()),
        format!("Date: {}", format_date(&meeting.date)),
    ];
    if let Some(minutes) = meeting.duration_minutes() {
        lines.push(format!("Duration: {} min", minutes));
    }
    if let Some(description) = meeting.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("Description: {}", description));
    }
    if !meeting.participants.is_empty() {
        lines.push("Participants:".to_string());
        lines.extend(meeting.participants.iter().map(participant_row));
    }
    if let Some(hint) = failure_hint(meeting) {
        lines.push(String::new());
        lines.push(hint);
    }
    lines.join("\n")
}

pub fn participant_row(participant: &Participant) -> String {
    let mut row = format!("  #{} {}", participant.id, participant.name);
    if let Some(label) = &participant.speaker_label {
        row.push_str(&format!(" ({})", label));
    }
    if let Some(email) = &participant.email {
        row.push_str(&format!(" <{}>", email));
    }
    row
}

pub fn segment_line(segment: &TranscriptSegment) -> String {
    format!(
        "[{}] {}: {}",
        format_timestamp(segment.start_time),
        segment.speaker(),
        segment.text
    )
}

pub fn summary_text(summary: &Summary) -> String {
    let mut out = summary.full_summary.trim().to_string();
    if !summary.key_points.is_empty() {
        out.push_str("\n\nKey points:");
        for point in &summary.key_points {
            out.push_str(&format!("\n  - {}", point));
        }
    }
    if !summary.decisions.is_empty() {
        out.push_str("\n\nDecisions:");
        for decision in &summary.decisions {
            out.push_str(&format!("\n  - {}", decision));
        }
    }
    out
}

pub fn task_row(task: &Task) -> String {
    let mut row = format!("  #{} {} [{}]", task.id, task.title, task.priority.as_str());
    if let Some(name) = &task.assignee_name {
        row.push_str(&format!(" @{}", name));
    }
    if let Some(due) = task.due_date {
        row.push_str(&format!(" due {}", due));
    }
    row
}

pub fn task_board(board: &TaskBoard) -> String {
    board
        .columns()
        .map(|(status, tasks)| {
            let mut column = format!("{} ({})", status.label(), tasks.len());
            for task in tasks {
                column.push('\n');
                column.push_str(&task_row(task));
            }
            column
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn report_row(report: &ProgressReport) -> String {
    format!(
        "#{} {} [{}] {}",
        report.id,
        report.title(),
        report.report_type,
        format_date(&report.generated_at)
    )
}
