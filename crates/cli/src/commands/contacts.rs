// Contact request commands

use super::require_dashboard;
use crate::output::{print_records, OutputFormat};
use anyhow::{Context, Result};
use aspire_core::SessionService;
use clap::Subcommand;

const COLUMNS: &[(&str, &str, usize)] = &[
    ("id", "ID", 24),
    ("fullname", "NAME", 20),
    ("email", "EMAIL", 26),
    ("company", "COMPANY", 16),
    ("service", "SERVICE", 14),
    ("handled", "HANDLED", 7),
];

#[derive(Subcommand)]
pub enum ContactsCommand {
    /// List contact requests
    List,
}

pub async fn run(
    command: ContactsCommand,
    service: &SessionService,
    output: OutputFormat,
) -> Result<()> {
    require_dashboard(service)?;

    match command {
        ContactsCommand::List => {
            let contacts = service
                .contacts()
                .fetch()
                .await
                .context("Failed to fetch contacts")?;

            if output.is_text() {
                if contacts.is_empty() {
                    println!("No contacts found");
                    return Ok(());
                }
                print_records(&contacts, COLUMNS);
            } else {
                output.print_value(&contacts)?;
            }

            Ok(())
        }
    }
}
