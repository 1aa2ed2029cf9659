// Authorization client: the single outbound gateway to the Aspire API
// Decision: One attached bearer token per session kind; every call names the kind it speaks for
// Decision: 401 on a non-identity endpoint wipes every credential and redirects to the login route
// Decision: Identity endpoints (login/logout/me) are exempt so bad credentials surface as form errors

use crate::config::ClientConfig;
use crate::credentials::CredentialStore;
use crate::error::{ClientError, Result};
use crate::navigation::{NavigationReason, Navigator, Route};
use crate::session_kind::{SessionKind, SessionToken};
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Path fragments of identity endpoints whose 401s belong to the caller
const EXEMPT_PATH_MARKERS: [&str; 5] = [
    "auth/login",
    "admins/login",
    "auth/logout",
    "admins/logout",
    "auth/me",
];

/// Whether a 401 on this path is left to the caller instead of expiring the session
pub fn is_identity_endpoint(path: &str) -> bool {
    EXEMPT_PATH_MARKERS
        .iter()
        .any(|marker| path.contains(marker))
}

/// HTTP gateway that attaches bearer tokens and intercepts authentication failures
pub struct AuthClient {
    config: ClientConfig,
    http: reqwest::Client,
    tokens: RwLock<HashMap<SessionKind, SessionToken>>,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    expiry: watch::Sender<u64>,
}

impl AuthClient {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        let (expiry, _) = watch::channel(0);

        Ok(Self {
            config,
            http,
            tokens: RwLock::new(HashMap::new()),
            store,
            navigator,
            expiry,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Token currently attached for a kind
    pub fn token(&self, kind: SessionKind) -> Option<SessionToken> {
        self.tokens.read().get(&kind).cloned()
    }

    /// Attach or detach the bearer token for a kind
    ///
    /// Attaching persists the token; detaching clears the kind's stored slot.
    /// Both are best-effort on the store side and idempotent.
    pub fn set_token(&self, kind: SessionKind, token: Option<SessionToken>) {
        match token {
            Some(token) => {
                self.store.set(kind, &token);
                self.tokens.write().insert(kind, token);
                tracing::debug!(kind = %kind, "Bearer token attached");
            }
            None => {
                self.tokens.write().remove(&kind);
                self.store.clear(kind);
                tracing::debug!(kind = %kind, "Bearer token detached");
            }
        }
    }

    /// Attach a token without touching the store (startup rehydration)
    pub(crate) fn attach(&self, kind: SessionKind, token: SessionToken) {
        self.tokens.write().insert(kind, token);
    }

    /// Drop every attached token, leaving the store alone
    pub(crate) fn detach_all(&self) {
        self.tokens.write().clear();
    }

    /// Subscribe to session expiry notifications
    ///
    /// The value is a counter bumped once per intercepted 401.
    pub fn subscribe_expiry(&self) -> watch::Receiver<u64> {
        self.expiry.subscribe()
    }

    /// Number of forced expiries since construction
    pub fn expiry_count(&self) -> u64 {
        *self.expiry.borrow()
    }

    pub async fn get(&self, kind: SessionKind, path: &str) -> Result<Value> {
        self.request::<()>(kind, Method::GET, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        kind: SessionKind,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        self.request(kind, Method::POST, path, Some(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        kind: SessionKind,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        self.request(kind, Method::PATCH, path, Some(body)).await
    }

    /// Send a request on behalf of a session kind
    ///
    /// Returns the decoded JSON body on 2xx. An empty body decodes to
    /// `Value::Null`, a non-JSON body to a JSON string.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        kind: SessionKind,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value> {
        let url = self.config.url(path);
        let mut builder = self.http.request(method.clone(), &url);

        if let Some(token) = self.token(kind) {
            builder = builder.header(AUTHORIZATION, token.bearer());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!(kind = %kind, method = %method, path = %path, "API request");

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        self.handle_response(method, path, response).await
    }

    async fn handle_response(
        &self,
        method: Method,
        path: &str,
        response: reqwest::Response,
    ) -> Result<Value> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if status.is_success() {
            return Ok(decode_body(&text));
        }

        let message = server_message(&text);
        tracing::debug!(method = %method, path = %path, status = status.as_u16(), "API error response");

        if status == StatusCode::UNAUTHORIZED {
            if !is_identity_endpoint(path) {
                self.expire(path);
            }
            return Err(ClientError::Unauthorized { message });
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Wipe every credential and send the user back to the login route
    fn expire(&self, path: &str) {
        tracing::warn!(path = %path, "Session rejected by API, clearing credentials");
        self.store.clear_all();
        self.detach_all();
        self.expiry.send_modify(|count| *count += 1);
        self.navigator
            .navigate(Route::Login, NavigationReason::SessionExpired);
    }

    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.config.request_timeout)
        } else {
            ClientError::Transport(err)
        }
    }
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// The `message` field of an error body, if any
fn server_message(text: &str) -> Option<String> {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.trim().is_empty())
}
