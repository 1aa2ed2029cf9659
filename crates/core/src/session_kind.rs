// Session kinds and bearer tokens
//
// Each kind owns one credential slot, one attached bearer token in the
// AuthClient and one SessionContainer. The kinds never share state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which class of principal a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Ordinary user session
    User,
    /// Staff/admin session
    Admin,
}

impl SessionKind {
    /// Both kinds, in guard evaluation order
    pub const ALL: [SessionKind; 2] = [SessionKind::User, SessionKind::Admin];

    /// Key of this kind's slot in the credential store
    pub fn storage_key(&self) -> &'static str {
        match self {
            SessionKind::User => "auth_token",
            SessionKind::Admin => "admin_token",
        }
    }

    pub fn login_path(&self) -> &'static str {
        match self {
            SessionKind::User => "/api/user/auth/login",
            SessionKind::Admin => "/api/admins/login",
        }
    }

    pub fn logout_path(&self) -> &'static str {
        match self {
            SessionKind::User => "/api/user/auth/logout",
            SessionKind::Admin => "/api/admins/logout",
        }
    }

    /// Identity-check endpoint, only users have one
    pub fn profile_path(&self) -> Option<&'static str> {
        match self {
            SessionKind::User => Some("/api/user/auth/me"),
            SessionKind::Admin => None,
        }
    }

    /// Field holding the account object in a login response
    pub fn profile_field(&self) -> &'static str {
        match self {
            SessionKind::User => "user",
            SessionKind::Admin => "admin",
        }
    }

}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(SessionKind::User),
            "admin" => Ok(SessionKind::Admin),
            other => Err(format!(
                "Unknown session kind: {} (expected admin or user)",
                other
            )),
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::User => write!(f, "user"),
            SessionKind::Admin => write!(f, "admin"),
        }
    }
}

/// Opaque bearer credential
///
/// The remote API is the only authority on validity; nothing here inspects
/// the contents. `Debug` is redacted so tokens never reach the logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token, rejecting blank strings
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}
