// Error types for the session layer

use std::time::Duration;
use thiserror::Error;

/// Result type alias for session layer operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the authorization client and the containers built on it
#[derive(Debug, Error)]
pub enum ClientError {
    /// Form input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// No response within the per-call timeout
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    /// Connection or protocol failure, no usable response
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Server answered 401
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("no message"))]
    Unauthorized { message: Option<String> },

    /// HTTP client could not be constructed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation not offered for this session kind
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl ClientError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    /// HTTP status of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Whether no response was received at all
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Timeout(_) | ClientError::Transport(_))
    }

    /// Best-effort human-readable message for notifications
    ///
    /// Prefers the server's `message`, then the error's own text for
    /// client-side failures, then the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                message: Some(m), ..
            }
            | ClientError::Unauthorized { message: Some(m) } => m.clone(),
            ClientError::Api { message: None, .. }
            | ClientError::Unauthorized { message: None } => fallback.to_string(),
            ClientError::Validation(_)
            | ClientError::Timeout(_)
            | ClientError::Transport(_)
            | ClientError::Configuration(_)
            | ClientError::Unsupported(_) => {
                let text = self.to_string();
                if text.trim().is_empty() {
                    fallback.to_string()
                } else {
                    text
                }
            }
        }
    }
}
