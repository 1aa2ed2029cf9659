// Client-side routes and the navigation seam
// Decision: Navigation is a trait so the authorization client can force a redirect
// without knowing whether it drives a terminal, a browser shell, or a test

use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;

/// Entry routes of the admin front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    /// `/`, unauthenticated entry point (login)
    Login,
    /// `/dashboard`, protected
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Dashboard => "/dashboard",
        }
    }

    /// Whether the route guard must run before rendering
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Why a navigation happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationReason {
    /// Requested by the caller
    Requested,
    /// Route guard found no session
    GuardDenied,
    /// A non-identity call came back 401
    SessionExpired,
}

/// Front-end navigation sink
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route, reason: NavigationReason);
}

/// Navigator that remembers every navigation in order
///
/// Used by the CLI to report forced redirects after a command finishes, and
/// by tests to assert on them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: RwLock<Vec<(Route, NavigationReason)>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<(Route, NavigationReason)> {
        self.history.read().clone()
    }

    pub fn last(&self) -> Option<(Route, NavigationReason)> {
        self.history.read().last().copied()
    }

    /// Whether a 401 forced the user back to the login route
    pub fn session_expired(&self) -> bool {
        self.history
            .read()
            .iter()
            .any(|(route, reason)| *route == Route::Login && *reason == NavigationReason::SessionExpired)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route, reason: NavigationReason) {
        tracing::debug!(route = %route, reason = ?reason, "Navigating");
        self.history.write().push((route, reason));
    }
}
