use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{MeetingId, ParticipantId, ReportId, ReportType, TaskId, TaskStatus};

#[derive(Parser, Debug)]
#[command(name = "meeting-assistant")]
#[command(about = "Upload meetings and follow their transcripts, summaries and tasks", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Meeting service API root (overrides the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Create, upload, inspect and follow meetings
    Meetings(MeetingCliArgs),
    /// Print a meeting's transcript
    Transcript {
        /// Meeting ID
        id: MeetingId,
    },
    /// Print a meeting's summary
    Summary {
        /// Meeting ID
        id: MeetingId,
        /// Ask the service to recompute the summary first
        #[arg(long)]
        regenerate: bool,
    },
    /// View and update extracted tasks
    Tasks(TaskCliArgs),
    /// View and rename meeting participants
    Participants(ParticipantCliArgs),
    /// List, view and request progress reports
    Reports(ReportCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct MeetingCliArgs {
    #[command(subcommand)]
    pub command: MeetingCommand,
}

#[derive(Subcommand, Debug)]
pub enum MeetingCommand {
    /// List meetings
    List,
    /// Show meeting details
    Show {
        /// Meeting ID
        id: MeetingId,
    },
    /// Create a meeting, optionally uploading its recording
    Create {
        /// Meeting title
        #[arg(short, long)]
        title: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// Audio or video recording to upload
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Upload a recording to an existing meeting
    Upload {
        /// Meeting ID
        id: MeetingId,
        /// Audio or video recording
        file: PathBuf,
    },
    /// Delete a meeting
    Delete {
        /// Meeting ID
        id: MeetingId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Follow processing until it finishes, then print the results
    Watch {
        /// Meeting ID
        id: MeetingId,
    },
}

#[derive(ClapArgs, Debug)]
pub struct TaskCliArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Show tasks grouped by status
    List {
        /// Only tasks from this meeting
        #[arg(short, long)]
        meeting: Option<MeetingId>,
        /// Only tasks with this status (pending, in_progress, completed)
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    /// Move a task to another status
    SetStatus {
        /// Task ID
        task_id: TaskId,
        /// New status (pending, in_progress, completed)
        status: TaskStatus,
        /// Meeting the task belongs to; reloads that meeting's tasks
        #[arg(short, long)]
        meeting: Option<MeetingId>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct ParticipantCliArgs {
    #[command(subcommand)]
    pub command: ParticipantCommand,
}

#[derive(Subcommand, Debug)]
pub enum ParticipantCommand {
    /// List a meeting's participants
    List {
        /// Meeting ID
        meeting_id: MeetingId,
    },
    /// Give a participant a name (and optionally an email)
    Rename {
        /// Meeting ID
        meeting_id: MeetingId,
        /// Participant ID
        participant_id: ParticipantId,
        /// New display name
        name: String,
        #[arg(short, long)]
        email: Option<String>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct ReportCliArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// List reports
    List,
    /// Show a report
    Show {
        /// Report ID
        id: ReportId,
    },
    /// Request a new report
    Generate {
        /// Scope the report to one meeting
        #[arg(short, long)]
        meeting: Option<MeetingId>,
        /// Report type (meeting, weekly, custom)
        #[arg(short = 't', long = "type")]
        report_type: Option<ReportType>,
    },
}
