// Route guard for protected views
// Decision: Binary decision with no loading state; re-evaluated on every navigation
// Decision: Falls back to the credential store so a not-yet-rehydrated state never locks the user out

use crate::credentials::CredentialStore;
use crate::navigation::Route;
use crate::session::SessionContainer;
use crate::session_kind::SessionKind;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum GuardDecision {
    Allow,
    Deny { redirect: Route },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Pure access decision
///
/// Allows when either kind has an in-memory token, or, failing that, when
/// either kind has a stored token.
pub fn decide(
    route: Route,
    user_authenticated: bool,
    admin_authenticated: bool,
    store: &dyn CredentialStore,
) -> GuardDecision {
    if !route.is_protected() || user_authenticated || admin_authenticated {
        return GuardDecision::Allow;
    }

    if SessionKind::ALL.iter().any(|kind| store.get(*kind).is_some()) {
        return GuardDecision::Allow;
    }

    GuardDecision::Deny {
        redirect: Route::Login,
    }
}

/// Guard bound to the live session containers
#[derive(Clone)]
pub struct RouteGuard {
    user: SessionContainer,
    admin: SessionContainer,
    store: Arc<dyn CredentialStore>,
}

impl RouteGuard {
    pub fn new(
        user: SessionContainer,
        admin: SessionContainer,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self { user, admin, store }
    }

    pub fn check(&self, route: Route) -> GuardDecision {
        decide(
            route,
            self.user.state().is_authenticated(),
            self.admin.state().is_authenticated(),
            self.store.as_ref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use crate::session_kind::SessionToken;

    const DENIED: GuardDecision = GuardDecision::Deny {
        redirect: Route::Login,
    };

    #[test]
    fn test_empty_everything_denies() {
        let store = MemoryCredentialStore::new();
        assert_eq!(decide(Route::Dashboard, false, false, &store), DENIED);
    }

    #[test]
    fn test_login_route_is_public() {
        let store = MemoryCredentialStore::new();
        assert_eq!(decide(Route::Login, false, false, &store), GuardDecision::Allow);
    }

    #[test]
    fn test_either_in_memory_kind_allows() {
        let store = MemoryCredentialStore::new();
        assert!(decide(Route::Dashboard, true, false, &store).is_allowed());
        assert!(decide(Route::Dashboard, false, true, &store).is_allowed());
    }

    #[test]
    fn test_stored_token_allows_before_rehydration() {
        let store = MemoryCredentialStore::new();
        store.set(SessionKind::User, &SessionToken::new("u1").unwrap());
        assert!(decide(Route::Dashboard, false, false, &store).is_allowed());

        store.clear(SessionKind::User);
        store.set(SessionKind::Admin, &SessionToken::new("a1").unwrap());
        assert!(decide(Route::Dashboard, false, false, &store).is_allowed());

        store.clear_all();
        assert_eq!(decide(Route::Dashboard, false, false, &store), DENIED);
    }
}
