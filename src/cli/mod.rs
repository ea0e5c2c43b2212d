use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use crate::client::{HttpResourceClient, ResourceClient};
use crate::config::Config;

pub mod args;
mod meetings;
mod participants;
pub mod render;
mod reports;
mod tasks;

pub use args::{Cli, CliCommand};
pub use meetings::{handle_meeting_command, handle_summary_command, handle_transcript_command};
pub use participants::handle_participant_command;
pub use reports::handle_report_command;
pub use tasks::handle_task_command;

/// Loaded configuration plus a client for the configured server.
pub struct Session {
    pub config: Config,
    pub client: Arc<dyn ResourceClient>,
}

impl Session {
    pub fn connect(api_url: Option<String>) -> Result<Self> {
        let config = Config::load()?.with_base_url(api_url);
        debug!("Using meeting service at {}", config.server.base_url);

        let client = HttpResourceClient::from_config(&config.server)
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }
}
