//! CLI handlers for meeting, transcript and summary commands.

use anyhow::{bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use super::args::{MeetingCliArgs, MeetingCommand};
use super::render;
use super::Session;
use crate::client::AudioFile;
use crate::error::Error;
use crate::meeting::{
    MeetingResources, MeetingStatusTracker, ResourceAggregator, Slot, UploadCoordinator,
};
use crate::models::{Meeting, MeetingId};
use crate::tasks::partition;

pub async fn handle_meeting_command(session: &Session, args: MeetingCliArgs) -> Result<()> {
    match args.command {
        MeetingCommand::List => list_meetings(session).await,
        MeetingCommand::Show { id } => show_meeting(session, id).await,
        MeetingCommand::Create {
            title,
            description,
            file,
        } => create_meeting(session, &title, description.as_deref(), file.as_deref()).await,
        MeetingCommand::Upload { id, file } => upload_recording(session, id, &file).await,
        MeetingCommand::Delete { id, yes } => delete_meeting(session, id, yes).await,
        MeetingCommand::Watch { id } => watch_meeting(session, id).await,
    }
}

async fn list_meetings(session: &Session) -> Result<()> {
    let meetings = session
        .client
        .list_meetings()
        .await
        .context("Failed to list meetings")?;

    if meetings.is_empty() {
        println!("No meetings yet. Create one with: meeting-assistant meetings create --title <TITLE>");
        return Ok(());
    }

    for meeting in &meetings {
        println!("{}", render::meeting_row(meeting));
    }

    Ok(())
}

async fn show_meeting(session: &Session, id: MeetingId) -> Result<()> {
    let meeting = fetch_meeting(session, id).await?;
    println!("{}", render::meeting_details(&meeting));
    Ok(())
}

async fn create_meeting(
    session: &Session,
    title: &str,
    description: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let coordinator = UploadCoordinator::new(session.client.clone());

    let spinner = file.map(|path| {
        let pb = create_spinner();
        pb.set_message(format!("Uploading {}...", path.display()));
        pb
    });

    let result = coordinator
        .create_and_maybe_upload(title, description, file)
        .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(meeting) => {
            println!("Created meeting #{}: {}", meeting.id, meeting.title);
            println!("Status: {}", meeting.status.label());
            if meeting.status.needs_polling() {
                println!(
                    "Follow processing with: meeting-assistant meetings watch {}",
                    meeting.id
                );
            }
            Ok(())
        }
        Err(Error::UploadFailed { meeting_id, source }) => {
            bail!(
                "Meeting #{} was created but the upload failed: {}\nRetry with: meeting-assistant meetings upload {} <file>",
                meeting_id,
                source,
                meeting_id
            )
        }
        Err(e) => Err(e).context("Failed to create meeting"),
    }
}

async fn upload_recording(session: &Session, id: MeetingId, file: &Path) -> Result<()> {
    let audio = AudioFile::open(file).await?;

    let pb = create_spinner();
    pb.set_message(format!("Uploading {} ({} bytes)...", audio.file_name(), audio.len()));
    let result = session.client.upload_audio(id, &audio).await;
    pb.finish_and_clear();

    let meeting = result.with_context(|| format!("Failed to upload audio to meeting #{}", id))?;
    println!("Uploaded {} to meeting #{}", audio.file_name(), meeting.id);
    println!("Status: {}", meeting.status.label());

    Ok(())
}

async fn delete_meeting(session: &Session, id: MeetingId, yes: bool) -> Result<()> {
    let meeting = fetch_meeting(session, id).await?;

    if !yes {
        if !std::io::stdin().is_terminal() {
            bail!("Refusing to delete without confirmation; pass --yes");
        }
        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete meeting #{} \"{}\"?", meeting.id, meeting.title))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Delete cancelled.");
            return Ok(());
        }
    }

    session
        .client
        .delete_meeting(id)
        .await
        .with_context(|| format!("Failed to delete meeting #{}", id))?;
    println!("Deleted meeting #{}", id);

    Ok(())
}

async fn watch_meeting(session: &Session, id: MeetingId) -> Result<()> {
    let tracker = MeetingStatusTracker::from_config(id, session.client.clone(), &session.config.polling);

    let meeting = tracker
        .refresh()
        .await
        .with_context(|| format!("Failed to load meeting #{}", id))?;
    println!("Meeting #{}: {}", meeting.id, meeting.title);

    let meeting = if tracker.is_polling() {
        let pb = create_spinner();
        pb.set_message(meeting.status.label().to_string());
        let outcome = follow_processing(&tracker, &pb, tokio::signal::ctrl_c()).await;
        pb.finish_and_clear();
        outcome?.unwrap_or(meeting)
    } else {
        meeting
    };

    println!("Status: {}", meeting.status.label());
    if let Some(hint) = render::failure_hint(&meeting) {
        println!("{}", hint);
        return Ok(());
    }

    let aggregator = ResourceAggregator::new(session.client.clone());
    match aggregator.load_for(&meeting).await {
        Some(resources) => print_resources(&resources),
        None => println!("Nothing to show until the recording has been processed."),
    }

    Ok(())
}

/// Show status changes on `pb` until the tracker settles. `shutdown` is
/// created once by the caller so a signal between updates is not lost.
async fn follow_processing<F, T>(
    tracker: &MeetingStatusTracker,
    pb: &ProgressBar,
    shutdown: F,
) -> Result<Option<Meeting>>
where
    F: Future<Output = T>,
{
    let mut updates = tracker.subscribe();
    let settled = tracker.settled();
    tokio::pin!(settled);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut settled => return Ok(result?),
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok((&mut settled).await?);
                }
                if let Some(m) = updates.borrow_and_update().as_ref() {
                    pb.set_message(m.status.label().to_string());
                }
            }
            _ = &mut shutdown => {
                tracker.teardown();
                bail!("Stopped watching meeting #{}", tracker.meeting_id());
            }
        }
    }
}

fn print_resources(resources: &MeetingResources) {
    println!("\n--- Summary ---");
    match resources.summary() {
        Some(summary) => println!("{}", render::summary_text(summary)),
        None => println!("{}", resources.summary.reason().unwrap_or("Unavailable")),
    }

    println!("\n--- Tasks ---");
    match resources.tasks.reason() {
        Some(reason) => println!("{}", reason),
        None => println!("{}", render::task_board(&partition(resources.tasks()))),
    }

    println!("\n--- Transcript ---");
    match resources.transcript() {
        Some(transcript) => {
            for segment in &transcript.segments {
                println!("{}", render::segment_line(segment));
            }
        }
        None => println!("{}", resources.transcript.reason().unwrap_or("Unavailable")),
    }
}

pub async fn handle_transcript_command(session: &Session, id: MeetingId) -> Result<()> {
    let transcript = session
        .client
        .get_transcript(id)
        .await
        .with_context(|| format!("No transcript for meeting #{}", id))?;

    if transcript.segments.is_empty() {
        println!("{}", transcript.full_text);
        return Ok(());
    }

    println!("Speakers: {}", transcript.speakers().join(", "));
    for segment in &transcript.segments {
        println!("{}", render::segment_line(segment));
    }

    Ok(())
}

pub async fn handle_summary_command(session: &Session, id: MeetingId, regenerate: bool) -> Result<()> {
    let aggregator = ResourceAggregator::new(session.client.clone());

    let slot = if regenerate {
        let pb = create_spinner();
        pb.set_message("Regenerating summary...");
        let result = aggregator.regenerate_summary(id).await;
        pb.finish_and_clear();
        result.with_context(|| format!("Failed to regenerate summary for meeting #{}", id))?
    } else {
        aggregator.reload_summary(id).await
    };

    match slot {
        Slot::Ready(summary) => println!("{}", render::summary_text(&summary)),
        Slot::Unavailable(reason) => {
            bail!("Summary for meeting #{} is not available: {}", id, reason)
        }
    }

    Ok(())
}

async fn fetch_meeting(session: &Session, id: MeetingId) -> Result<Meeting> {
    session
        .client
        .get_meeting(id)
        .await
        .with_context(|| format!("Failed to load meeting #{}", id))
}

/// Create a spinner for indeterminate waits.
fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
