// Login, logout, and session inspection commands

use super::parse_kind;
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};
use anyhow::{Context, Result};
use aspire_core::{Credentials, SessionKind, SessionService};
use serde::Serialize;
use serde_json::Value;

/// Session summary for `status`
#[derive(Debug, Serialize)]
struct SessionSummary {
    kind: SessionKind,
    authenticated: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    api_url: String,
    credentials_file: String,
    sessions: Vec<SessionSummary>,
}

pub async fn login(
    service: &SessionService,
    output: OutputFormat,
    quiet: bool,
    kind: &str,
    email: String,
    password: String,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let profile = service
        .session(kind)
        .login(&Credentials::new(email, password))
        .await
        .with_context(|| format!("Failed to log in as {}", kind))?;

    if output.is_text() {
        if !quiet {
            println!("Logged in as {}", kind);
            if let Some(profile) = &profile {
                print_profile(profile);
            }
        }
    } else {
        output.print_value(&profile)?;
    }

    Ok(())
}

pub async fn logout(
    service: &SessionService,
    output: OutputFormat,
    quiet: bool,
    kind: &str,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let session = service.session(kind);

    if !session.state().is_authenticated() {
        if output.is_text() && !quiet {
            println!("Not logged in as {}", kind);
        }
        return Ok(());
    }

    // Local credentials are gone either way; only the server call can fail
    session
        .logout()
        .await
        .with_context(|| format!("Server logout failed, local {} session cleared", kind))?;

    if output.is_text() {
        if !quiet {
            println!("Logged out ({})", kind);
        }
    } else {
        output.print_value(&serde_json::json!({ "kind": kind, "logged_out": true }))?;
    }

    Ok(())
}

/// Show the signed-in user's profile from the identity check
pub async fn whoami(service: &SessionService, output: OutputFormat) -> Result<()> {
    let session = service.session(SessionKind::User);
    if !session.state().is_authenticated() {
        anyhow::bail!("Not logged in as user. Run `aspire login --as user` first.");
    }

    let profile = session
        .fetch_profile()
        .await
        .context("Failed to fetch profile")?;

    if output.is_text() {
        match &profile {
            Some(profile) => print_profile(profile),
            None => println!("No profile returned"),
        }
    } else {
        output.print_value(&profile)?;
    }

    Ok(())
}

/// Report which sessions are held, without contacting the API
pub fn status(service: &SessionService, output: OutputFormat) -> Result<()> {
    let config = service.client().config();
    let report = StatusReport {
        api_url: config.base_url.clone(),
        credentials_file: config.credentials_path.display().to_string(),
        sessions: SessionKind::ALL
            .iter()
            .map(|kind| SessionSummary {
                kind: *kind,
                authenticated: service.session(*kind).state().is_authenticated(),
            })
            .collect(),
    };

    if output.is_text() {
        print_field("API", &report.api_url);
        print_field("Credentials", &report.credentials_file);
        println!();
        print_table_header(&[("SESSION", 10), ("STATE", 14)]);
        for session in &report.sessions {
            let state = if session.authenticated {
                "logged in"
            } else {
                "logged out"
            };
            print_table_row(&[(&session.kind.to_string(), 10), (state, 14)]);
        }
    } else {
        output.print_value(&report)?;
    }

    Ok(())
}

fn print_profile(profile: &Value) {
    for (label, field) in [
        ("ID", "_id"),
        ("Name", "fullname"),
        ("Email", "email"),
        ("Location", "location"),
    ] {
        if let Some(value) = profile.get(field).and_then(Value::as_str) {
            print_field(label, value);
        }
    }
}
