//! CLI handler for participant commands.

use anyhow::{bail, Context, Result};

use super::args::{ParticipantCliArgs, ParticipantCommand};
use super::render;
use super::Session;
use crate::models::ParticipantUpdate;

pub async fn handle_participant_command(session: &Session, args: ParticipantCliArgs) -> Result<()> {
    match args.command {
        ParticipantCommand::List { meeting_id } => {
            let participants = session
                .client
                .list_participants(meeting_id)
                .await
                .with_context(|| format!("Failed to load participants of meeting #{}", meeting_id))?;

            if participants.is_empty() {
                println!("No participants identified for meeting #{}", meeting_id);
                return Ok(());
            }
            for participant in &participants {
                println!("{}", render::participant_row(participant));
            }
            Ok(())
        }
        ParticipantCommand::Rename {
            meeting_id,
            participant_id,
            name,
            email,
        } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("Participant name cannot be empty");
            }

            let update = ParticipantUpdate {
                name: Some(name.to_string()),
                email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            };
            let participant = session
                .client
                .update_participant(meeting_id, participant_id, &update)
                .await
                .with_context(|| format!("Failed to update participant #{}", participant_id))?;

            println!("Updated participant:");
            println!("{}", render::participant_row(&participant));
            Ok(())
        }
    }
}
