//! Response envelope unwrapping
//!
//! The API is inconsistent about wrapping payloads. Every accepted shape is
//! listed here once, in the order it is tried, and reused by all callers.
//!
//! Lists, for entity `E` with wrapper key `w`:
//! 1. bare array: `[...]`
//! 2. `{"data": [...]}`
//! 3. `{"<w>": [...]}` (`admins`, `jobs`, `contacts`, `applications`;
//!    applications also accept `items`)
//!
//! Single records: `{"data": {...}}`, then `{"<singular>": {...}}`, then the
//! bare object.
//!
//! Login responses: `token` / `<profile>` at the top level, then nested under
//! `data`.

use crate::session_kind::{SessionKind, SessionToken};
use serde_json::Value;

/// Record collections served by the admin API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Admins,
    Jobs,
    Contacts,
    Applications,
}

impl Entity {
    /// Collection endpoint
    pub fn path(&self) -> &'static str {
        match self {
            Entity::Admins => "/api/admins",
            Entity::Jobs => "/api/jobs",
            Entity::Contacts => "/api/contacts",
            Entity::Applications => "/api/applications",
        }
    }

    /// Domain-named list wrappers, tried after `data`
    pub fn list_keys(&self) -> &'static [&'static str] {
        match self {
            Entity::Admins => &["admins"],
            Entity::Jobs => &["jobs"],
            Entity::Contacts => &["contacts"],
            Entity::Applications => &["applications", "items"],
        }
    }

    /// Domain-named single-record wrapper
    pub fn record_key(&self) -> &'static str {
        match self {
            Entity::Admins => "admin",
            Entity::Jobs => "job",
            Entity::Contacts => "contact",
            Entity::Applications => "application",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Entity::Admins => "admins",
            Entity::Jobs => "jobs",
            Entity::Contacts => "contacts",
            Entity::Applications => "applications",
        }
    }
}

/// Extract the record list from any accepted list shape
pub fn unwrap_list(entity: Entity, payload: &Value) -> Option<Vec<Value>> {
    if let Value::Array(items) = payload {
        return Some(items.clone());
    }

    std::iter::once("data")
        .chain(entity.list_keys().iter().copied())
        .find_map(|key| payload.get(key).and_then(Value::as_array))
        .cloned()
}

/// Extract a single record from any accepted record shape
pub fn unwrap_record(entity: Entity, payload: &Value) -> Option<Value> {
    ["data", entity.record_key()]
        .iter()
        .find_map(|key| payload.get(*key).filter(|v| v.is_object()))
        .or_else(|| Some(payload).filter(|v| v.is_object()))
        .cloned()
}

/// Bearer token from a login response
pub fn extract_token(payload: &Value) -> Option<SessionToken> {
    payload
        .get("token")
        .or_else(|| payload.get("data").and_then(|d| d.get("token")))
        .and_then(Value::as_str)
        .and_then(|raw| SessionToken::new(raw))
}

/// Account object accompanying a login response
pub fn extract_login_profile(kind: SessionKind, payload: &Value) -> Option<Value> {
    let field = kind.profile_field();
    payload
        .get(field)
        .or_else(|| payload.get("data").and_then(|d| d.get(field)))
        .filter(|v| !v.is_null())
        .cloned()
}

/// Profile from an identity-check response: `data`, else the bare payload
pub fn unwrap_profile(payload: &Value) -> Option<Value> {
    payload
        .get("data")
        .filter(|v| !v.is_null())
        .or(Some(payload))
        .filter(|v| !v.is_null())
        .cloned()
}

/// Identifier of a record: `_id`, then `id`
pub fn record_id(record: &Value) -> Option<&Value> {
    record
        .get("_id")
        .filter(|v| !v.is_null())
        .or_else(|| record.get("id").filter(|v| !v.is_null()))
}

/// Whether a record's id equals a path identifier
pub fn id_matches(record: &Value, id: &str) -> bool {
    match record_id(record) {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}
