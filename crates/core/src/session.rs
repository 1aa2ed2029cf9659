// Session state container, one per session kind
// Decision: State is an explicit handle owned by SessionService, not a process-wide global
// Decision: Expiry is observed lazily through a watch channel; no background task is spawned
// Decision: Logout always finishes local cleanup, even when the remote call fails

use crate::client::AuthClient;
use crate::envelope;
use crate::error::{ClientError, Result};
use crate::forms;
use crate::session_kind::{SessionKind, SessionToken};
use crate::status::OperationStatus;
use parking_lot::RwLock;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

const LOGIN_FAILED: &str = "Login failed";
const LOGOUT_FAILED: &str = "Failed to logout";
const PROFILE_FAILED: &str = "Failed to fetch profile";

/// Login form
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Client-side checks, run before any request is made
    pub fn validate(&self) -> Result<()> {
        forms::require(&self.email, "Please enter your email")?;
        if !forms::looks_like_email(&self.email) {
            return Err(ClientError::validation("Enter a valid email"));
        }
        forms::require(&self.password, "Please enter your password")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// What we currently believe about one session kind
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Token in memory, mirrors the client's attached token
    pub token: Option<SessionToken>,
    /// Account object from login or the identity check, passed through as-is
    pub profile: Option<Value>,
    pub login: OperationStatus,
    pub logout: OperationStatus,
    pub profile_fetch: OperationStatus,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

struct Inner {
    state: SessionState,
    expiry: watch::Receiver<u64>,
}

impl Inner {
    /// Apply any forced expiry that happened since the last access
    fn sync_expiry(&mut self) {
        if self.expiry.has_changed().unwrap_or(false) {
            self.expiry.borrow_and_update();
            self.state.token = None;
            self.state.profile = None;
        }
    }
}

/// Reactive session state for one kind
///
/// Cheap to clone; clones share state. Locks are released before every
/// network call.
#[derive(Clone)]
pub struct SessionContainer {
    kind: SessionKind,
    client: Arc<AuthClient>,
    inner: Arc<RwLock<Inner>>,
}

impl SessionContainer {
    pub fn new(kind: SessionKind, client: Arc<AuthClient>) -> Self {
        let expiry = client.subscribe_expiry();
        Self {
            kind,
            client,
            inner: Arc::new(RwLock::new(Inner {
                state: SessionState::default(),
                expiry,
            })),
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut inner = self.inner.write();
        inner.sync_expiry();
        f(&mut inner.state)
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.update(|state| state.clone())
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.update(|state| state.token.clone())
    }

    pub fn profile(&self) -> Option<Value> {
        self.update(|state| state.profile.clone())
    }

    /// Seed the in-memory token from the credential store
    ///
    /// Startup only, no network. Also attaches the stored token to the client
    /// so the first request after a restart is authenticated.
    pub fn rehydrate(&self) -> Option<SessionToken> {
        let token = self.client.store().get(self.kind);
        if let Some(token) = &token {
            self.client.attach(self.kind, token.clone());
        }
        self.update(|state| state.token = token.clone());

        tracing::debug!(kind = %self.kind, found = token.is_some(), "Session rehydrated");
        token
    }

    /// Log in and adopt the returned token
    ///
    /// Returns the profile object that came with the token, if any.
    pub async fn login(&self, credentials: &Credentials) -> Result<Option<Value>> {
        credentials.validate()?;

        self.update(|state| state.login.start());

        let payload = match self
            .client
            .post(self.kind, self.kind.login_path(), credentials)
            .await
        {
            Ok(payload) => payload,
            Err(e) => {
                let message = e.user_message(LOGIN_FAILED);
                tracing::info!(kind = %self.kind, error = %message, "Login rejected");
                self.update(|state| state.login.fail(message));
                return Err(e);
            }
        };

        let Some(token) = envelope::extract_token(&payload) else {
            tracing::warn!(kind = %self.kind, "Login response carried no token");
            let err = ClientError::Api {
                status: 200,
                message: Some("Login response did not include a token".to_string()),
            };
            self.update(|state| state.login.fail(err.user_message(LOGIN_FAILED)));
            return Err(err);
        };
        let profile = envelope::extract_login_profile(self.kind, &payload);

        self.client.set_token(self.kind, Some(token.clone()));
        self.update(|state| {
            state.token = Some(token);
            state.profile = profile.clone();
            state.login.succeed();
        });

        tracing::info!(kind = %self.kind, "Logged in");
        Ok(profile)
    }

    /// Log out remotely (best-effort) and always clean up locally
    ///
    /// The remote failure, if any, is returned after cleanup.
    pub async fn logout(&self) -> Result<()> {
        self.update(|state| state.logout.start());

        let remote = self
            .client
            .request::<()>(self.kind, Method::POST, self.kind.logout_path(), None)
            .await;

        self.client.set_token(self.kind, None);

        match remote {
            Ok(_) => {
                self.update(|state| {
                    state.token = None;
                    state.profile = None;
                    state.logout.succeed();
                });
                tracing::info!(kind = %self.kind, "Logged out");
                Ok(())
            }
            Err(e) => {
                let message = e.user_message(LOGOUT_FAILED);
                self.update(|state| {
                    state.token = None;
                    state.profile = None;
                    state.logout.fail(message);
                });
                tracing::warn!(kind = %self.kind, error = %e, "Remote logout failed, local session cleared");
                Err(e)
            }
        }
    }

    /// Fetch the profile from the identity-check endpoint
    pub async fn fetch_profile(&self) -> Result<Option<Value>> {
        let Some(path) = self.kind.profile_path() else {
            return Err(ClientError::Unsupported(format!(
                "{} sessions have no profile endpoint",
                self.kind
            )));
        };

        self.update(|state| state.profile_fetch.start());

        match self.client.get(self.kind, path).await {
            Ok(payload) => {
                let profile = envelope::unwrap_profile(&payload);
                self.update(|state| {
                    state.profile = profile.clone();
                    state.profile_fetch.succeed();
                });
                Ok(profile)
            }
            Err(e) => {
                let message = e.user_message(PROFILE_FAILED);
                self.update(|state| state.profile_fetch.fail(message));
                Err(e)
            }
        }
    }

    /// Forget token and profile locally; no network, no store
    pub fn clear(&self) {
        self.update(|state| {
            state.token = None;
            state.profile = None;
        });
    }
}
