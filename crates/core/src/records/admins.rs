// Admin account management

use super::{Apply, Collection, CollectionState, Mutation, MutationRequest};
use crate::client::AuthClient;
use crate::envelope::Entity;
use crate::error::{ClientError, Result};
use crate::forms;
use crate::session_kind::SessionKind;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Create-admin form
#[derive(Debug, Clone, Default)]
pub struct NewAdmin {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub location: String,
}

impl NewAdmin {
    pub fn validate(&self) -> Result<()> {
        forms::require(&self.fullname, "Please enter full name")?;
        forms::require(&self.email, "Please enter email")?;
        if !forms::looks_like_email(&self.email) {
            return Err(ClientError::validation("Please enter a valid email"));
        }
        forms::require(&self.password, "Please enter password")?;
        forms::confirm_password(&self.password, &self.confirm_password)?;
        forms::require(&self.location, "Please enter location")
    }
}

/// Body of `POST /api/admins`; the confirmation never leaves the client
#[derive(Debug, Serialize)]
struct CreateAdminRequest<'a> {
    fullname: &'a str,
    email: &'a str,
    password: &'a str,
    location: &'a str,
}

/// Change-password form
#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<()> {
        forms::require(&self.old_password, "Please enter old password")?;
        forms::require(&self.new_password, "Please enter new password")?;
        forms::confirm_password(&self.new_password, &self.confirm_password)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordChangeRequest<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Serialize)]
struct BlockRequest {
    blocked: bool,
}

/// Admin accounts collection
#[derive(Clone)]
pub struct Admins {
    collection: Collection,
}

impl Admins {
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self {
            collection: Collection::new(Entity::Admins, client),
        }
    }

    pub fn state(&self) -> CollectionState {
        self.collection.state()
    }

    pub fn kind(&self) -> SessionKind {
        self.collection.kind()
    }

    pub async fn fetch(&self) -> Result<Vec<Value>> {
        self.collection.fetch().await
    }

    pub async fn ensure_loaded(&self) -> Result<Vec<Value>> {
        self.collection.ensure_loaded().await
    }

    /// Create an admin account and list it
    pub async fn create(&self, form: &NewAdmin) -> Result<Value> {
        form.validate()?;

        let body = serde_json::to_value(CreateAdminRequest {
            fullname: form.fullname.trim(),
            email: form.email.trim(),
            password: &form.password,
            location: form.location.trim(),
        })
        .map_err(|e| ClientError::validation(e.to_string()))?;

        self.collection
            .mutate(MutationRequest {
                mutation: Mutation::Create,
                method: Method::POST,
                path: Entity::Admins.path().to_string(),
                body: &body,
                failure: "Failed to create admin",
                apply: Apply::Prepend,
                echo: None,
            })
            .await
    }

    /// Change an admin's password
    pub async fn update_password(&self, id: &str, form: &PasswordChange) -> Result<Value> {
        forms::require(id, "Select an admin first")?;
        form.validate()?;

        let body = serde_json::to_value(PasswordChangeRequest {
            old_password: &form.old_password,
            new_password: &form.new_password,
        })
        .map_err(|e| ClientError::validation(e.to_string()))?;

        self.collection
            .mutate(MutationRequest {
                mutation: Mutation::UpdatePassword,
                method: Method::PATCH,
                path: format!("{}/{}/password", Entity::Admins.path(), id),
                body: &body,
                failure: "Failed to update password",
                apply: Apply::Merge(id.to_string()),
                echo: None,
            })
            .await
    }

    /// Block or unblock an admin
    pub async fn set_blocked(&self, id: &str, blocked: bool) -> Result<Value> {
        forms::require(id, "Select an admin first")?;

        let body = serde_json::to_value(BlockRequest { blocked })
            .map_err(|e| ClientError::validation(e.to_string()))?;

        self.collection
            .mutate(MutationRequest {
                mutation: Mutation::UpdateStatus,
                method: Method::PATCH,
                path: format!("{}/{}/block", Entity::Admins.path(), id),
                body: &body,
                failure: "Failed to update status",
                apply: Apply::Merge(id.to_string()),
                echo: None,
            })
            .await
    }
}
