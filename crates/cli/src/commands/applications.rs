// Job application commands

use super::require_dashboard;
use crate::output::{print_records, OutputFormat};
use anyhow::{Context, Result};
use aspire_core::SessionService;
use clap::Subcommand;

const COLUMNS: &[(&str, &str, usize)] = &[
    ("id", "ID", 24),
    ("fullname", "NAME", 20),
    ("email", "EMAIL", 26),
    ("phone", "PHONE", 14),
    ("company", "COMPANY", 16),
    ("createdAt", "RECEIVED", 20),
];

#[derive(Subcommand)]
pub enum ApplicationsCommand {
    /// List job applications
    List,
}

pub async fn run(
    command: ApplicationsCommand,
    service: &SessionService,
    output: OutputFormat,
) -> Result<()> {
    require_dashboard(service)?;

    match command {
        ApplicationsCommand::List => {
            let applications = service
                .applications()
                .fetch()
                .await
                .context("Failed to fetch applications")?;

            if output.is_text() {
                if applications.is_empty() {
                    println!("No applications found");
                    return Ok(());
                }
                print_records(&applications, COLUMNS);
            } else {
                output.print_value(&applications)?;
            }

            Ok(())
        }
    }
}
