// Client Configuration
//
// Configuration for the authorization client, loaded from environment variables.

use crate::credentials::FileCredentialStore;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Per-call timeout for every API request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URL used when `ASPIRE_API_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Configuration for talking to the Aspire API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,

    /// Per-call timeout
    pub request_timeout: Duration,

    /// Credentials file for the file-backed store
    pub credentials_path: PathBuf,
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `ASPIRE_API_BASE_URL`: API base URL (default: http://localhost:5000)
    /// - `ASPIRE_CREDENTIALS_PATH`: credentials file (default: ~/.config/aspire/credentials.json)
    pub fn from_env() -> Self {
        let base_url = env::var("ASPIRE_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let credentials_path = env::var("ASPIRE_CREDENTIALS_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(FileCredentialStore::default_path);

        Self::new(base_url).with_credentials_path(credentials_path)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            credentials_path: FileCredentialStore::default_path(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL for an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
