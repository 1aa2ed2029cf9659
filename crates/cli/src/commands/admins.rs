// Admin account management commands

use super::require_dashboard;
use crate::output::{print_field, print_records, OutputFormat};
use anyhow::{Context, Result};
use aspire_core::{NewAdmin, PasswordChange, SessionService};
use clap::Subcommand;
use serde_json::Value;

const COLUMNS: &[(&str, &str, usize)] = &[
    ("id", "ID", 24),
    ("fullname", "NAME", 20),
    ("email", "EMAIL", 28),
    ("location", "LOCATION", 16),
    ("blocked", "BLOCKED", 7),
];

#[derive(Subcommand)]
pub enum AdminsCommand {
    /// List admin accounts
    List,

    /// Create an admin account
    Create {
        /// Full name
        #[arg(long)]
        fullname: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long, env = "ASPIRE_NEW_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password confirmation (defaults to --password)
        #[arg(long, env = "ASPIRE_NEW_ADMIN_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: Option<String>,

        /// Location
        #[arg(long)]
        location: String,
    },

    /// Change an admin's password
    Password {
        /// Admin ID
        admin_id: String,

        /// Current password
        #[arg(long, env = "ASPIRE_OLD_PASSWORD", hide_env_values = true)]
        old_password: String,

        /// New password
        #[arg(long, env = "ASPIRE_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,

        /// New password confirmation (defaults to --new-password)
        #[arg(long, env = "ASPIRE_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: Option<String>,
    },

    /// Block an admin
    Block {
        /// Admin ID
        admin_id: String,
    },

    /// Unblock an admin
    Unblock {
        /// Admin ID
        admin_id: String,
    },
}

pub async fn run(
    command: AdminsCommand,
    service: &SessionService,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    require_dashboard(service)?;

    match command {
        AdminsCommand::List => list(service, output).await,
        AdminsCommand::Create {
            fullname,
            email,
            confirm_password,
            password,
            location,
        } => {
            let form = NewAdmin {
                fullname,
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
                location,
            };
            create(service, output, quiet, form).await
        }
        AdminsCommand::Password {
            admin_id,
            old_password,
            new_password,
            confirm_password,
        } => {
            let form = PasswordChange {
                old_password,
                confirm_password: confirm_password.unwrap_or_else(|| new_password.clone()),
                new_password,
            };
            update_password(service, output, quiet, &admin_id, form).await
        }
        AdminsCommand::Block { admin_id } => {
            set_blocked(service, output, quiet, &admin_id, true).await
        }
        AdminsCommand::Unblock { admin_id } => {
            set_blocked(service, output, quiet, &admin_id, false).await
        }
    }
}

async fn list(service: &SessionService, output: OutputFormat) -> Result<()> {
    let admins = service
        .admins()
        .fetch()
        .await
        .context("Failed to fetch admins")?;

    if output.is_text() {
        if admins.is_empty() {
            println!("No admins found");
            return Ok(());
        }
        print_records(&admins, COLUMNS);
    } else {
        output.print_value(&admins)?;
    }

    Ok(())
}

async fn create(
    service: &SessionService,
    output: OutputFormat,
    quiet: bool,
    form: NewAdmin,
) -> Result<()> {
    let response = service
        .admins()
        .create(&form)
        .await
        .context("Failed to create admin")?;

    if output.is_text() {
        if !quiet {
            println!("Created admin: {}", form.email);
            print_field("Name", &form.fullname);
            print_field("Location", &form.location);
        }
    } else {
        output.print_value(&response)?;
    }

    Ok(())
}

async fn update_password(
    service: &SessionService,
    output: OutputFormat,
    quiet: bool,
    admin_id: &str,
    form: PasswordChange,
) -> Result<()> {
    let response = service
        .admins()
        .update_password(admin_id, &form)
        .await
        .context("Failed to update password")?;

    report(output, quiet, &response, &format!("Password updated for admin {}", admin_id))
}

async fn set_blocked(
    service: &SessionService,
    output: OutputFormat,
    quiet: bool,
    admin_id: &str,
    blocked: bool,
) -> Result<()> {
    let response = service
        .admins()
        .set_blocked(admin_id, blocked)
        .await
        .context("Failed to update status")?;

    let verb = if blocked { "Blocked" } else { "Unblocked" };
    report(output, quiet, &response, &format!("{} admin {}", verb, admin_id))
}

fn report(output: OutputFormat, quiet: bool, response: &Value, message: &str) -> Result<()> {
    if output.is_text() {
        if !quiet {
            println!("{}", message);
        }
        Ok(())
    } else {
        output.print_value(response)
    }
}
