// CLI subcommands

pub mod admins;
pub mod applications;
pub mod auth;
pub mod contacts;
pub mod jobs;

use anyhow::Result;
use aspire_core::{GuardDecision, Route, SessionKind, SessionService};

/// Session kind from a `--as` value
pub fn parse_kind(value: &str) -> Result<SessionKind> {
    value.parse::<SessionKind>().map_err(anyhow::Error::msg)
}

/// Run the route guard for the dashboard before a protected command
pub fn require_dashboard(service: &SessionService) -> Result<()> {
    match service.navigate(Route::Dashboard) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Deny { .. } => {
            anyhow::bail!("Not logged in. Run `aspire login` first.")
        }
    }
}
