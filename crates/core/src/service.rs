// Session service: the explicit context every front end is built on
// Decision: Constructed with init() and released with dispose(); nothing happens at import time
// Decision: Failures of the two session kinds are reported separately, never coalesced

use crate::client::AuthClient;
use crate::config::ClientConfig;
use crate::credentials::CredentialStore;
use crate::envelope::Entity;
use crate::error::Result;
use crate::guard::{GuardDecision, RouteGuard};
use crate::navigation::{NavigationReason, Navigator, Route};
use crate::records::{Admins, Collection, Jobs};
use crate::session::SessionContainer;
use crate::session_kind::SessionKind;
use std::sync::Arc;

/// Wires the credential store, authorization client, session containers,
/// route guard and record collections together
pub struct SessionService {
    client: Arc<AuthClient>,
    navigator: Arc<dyn Navigator>,
    user: SessionContainer,
    admin: SessionContainer,
    guard: RouteGuard,
    admins: Admins,
    jobs: Jobs,
    contacts: Collection,
    applications: Collection,
}

impl SessionService {
    /// Build the service and rehydrate both session kinds from the store
    pub fn init(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Arc::new(AuthClient::new(config, store.clone(), navigator.clone())?);

        let user = SessionContainer::new(SessionKind::User, client.clone());
        let admin = SessionContainer::new(SessionKind::Admin, client.clone());
        user.rehydrate();
        admin.rehydrate();

        let guard = RouteGuard::new(user.clone(), admin.clone(), store);

        tracing::debug!(
            base_url = %client.config().base_url,
            user = user.state().is_authenticated(),
            admin = admin.state().is_authenticated(),
            "Session service initialized"
        );

        Ok(Self {
            admins: Admins::new(client.clone()),
            jobs: Jobs::new(client.clone()),
            contacts: Collection::new(Entity::Contacts, client.clone()),
            applications: Collection::new(Entity::Applications, client.clone()),
            client,
            navigator,
            user,
            admin,
            guard,
        })
    }

    pub fn client(&self) -> &Arc<AuthClient> {
        &self.client
    }

    pub fn session(&self, kind: SessionKind) -> &SessionContainer {
        match kind {
            SessionKind::User => &self.user,
            SessionKind::Admin => &self.admin,
        }
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn admins(&self) -> &Admins {
        &self.admins
    }

    pub fn jobs(&self) -> &Jobs {
        &self.jobs
    }

    pub fn contacts(&self) -> &Collection {
        &self.contacts
    }

    pub fn applications(&self) -> &Collection {
        &self.applications
    }

    /// Navigate to a route, running the guard for protected ones
    ///
    /// A denied navigation is redirected to the login route.
    pub fn navigate(&self, route: Route) -> GuardDecision {
        let decision = self.guard.check(route);
        match decision {
            GuardDecision::Allow => {
                self.navigator.navigate(route, NavigationReason::Requested);
            }
            GuardDecision::Deny { redirect } => {
                tracing::info!(route = %route, redirect = %redirect, "Navigation denied");
                self.navigator
                    .navigate(redirect, NavigationReason::GuardDenied);
            }
        }
        decision
    }

    /// Release the service
    ///
    /// Detaches in-memory tokens and forgets session state. Stored
    /// credentials are kept so the next init() resumes the session.
    pub fn dispose(self) {
        self.client.detach_all();
        self.user.clear();
        self.admin.clear();
        tracing::debug!("Session service disposed");
    }
}
