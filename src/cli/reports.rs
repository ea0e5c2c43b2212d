//! CLI handler for progress report commands.

use anyhow::{Context, Result};

use super::args::{ReportCliArgs, ReportCommand};
use super::render;
use super::Session;
use crate::models::ReportRequest;

pub async fn handle_report_command(session: &Session, args: ReportCliArgs) -> Result<()> {
    match args.command {
        ReportCommand::List => {
            let reports = session
                .client
                .list_reports()
                .await
                .context("Failed to list reports")?;

            if reports.is_empty() {
                println!("No reports yet. Request one with: meeting-assistant reports generate");
                return Ok(());
            }
            for report in &reports {
                println!("{}", render::report_row(report));
            }
            Ok(())
        }
        ReportCommand::Show { id } => {
            let report = session
                .client
                .get_report(id)
                .await
                .with_context(|| format!("Failed to load report #{}", id))?;

            println!("{}", render::report_row(&report));
            println!();
            println!(
                "{}",
                serde_json::to_string_pretty(&report.content)
                    .context("Failed to format report content")?
            );
            Ok(())
        }
        ReportCommand::Generate {
            meeting,
            report_type,
        } => {
            let request = ReportRequest {
                meeting_id: meeting,
                report_type,
            };
            session
                .client
                .generate_report(&request)
                .await
                .context("Failed to request report")?;

            println!("Report requested. It will appear in `meeting-assistant reports list` once generated.");
            Ok(())
        }
    }
}
