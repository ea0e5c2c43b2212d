use anyhow::Result;
use clap::Parser;
use meeting_assistant::cli::{
    handle_meeting_command, handle_participant_command, handle_report_command,
    handle_summary_command, handle_task_command, handle_transcript_command, Cli, CliCommand,
    Session,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let CliCommand::Version = cli.command {
        println!("meeting-assistant {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let session = Session::connect(cli.api_url)?;

    match cli.command {
        CliCommand::Meetings(args) => handle_meeting_command(&session, args).await,
        CliCommand::Transcript { id } => handle_transcript_command(&session, id).await,
        CliCommand::Summary { id, regenerate } => {
            handle_summary_command(&session, id, regenerate).await
        }
        CliCommand::Tasks(args) => handle_task_command(&session, args).await,
        CliCommand::Participants(args) => handle_participant_command(&session, args).await,
        CliCommand::Reports(args) => handle_report_command(&session, args).await,
        CliCommand::Version => Ok(()),
    }
}
