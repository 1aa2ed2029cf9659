// Record collections driven by the admin dashboard
// Decision: Records stay opaque serde_json::Value; only ids are interpreted
// Decision: Dashboard calls speak for whichever session opened the dashboard, admin first
// Decision: Failed mutations never touch the cached list

pub mod admins;
pub mod jobs;

use crate::client::AuthClient;
use crate::envelope::{self, Entity};
use crate::error::Result;
use crate::session_kind::SessionKind;
use crate::status::OperationStatus;
use parking_lot::RwLock;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub use admins::{Admins, NewAdmin, PasswordChange};
pub use jobs::{Jobs, NewJob};

/// Tracked write operations on a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    Create,
    UpdatePassword,
    UpdateStatus,
}

/// Cached list plus the status of every operation on it
#[derive(Debug, Clone, Default)]
pub struct CollectionState {
    pub items: Vec<Value>,
    pub fetch: OperationStatus,
    pub mutations: HashMap<Mutation, OperationStatus>,
}

impl CollectionState {
    pub fn mutation(&self, mutation: Mutation) -> OperationStatus {
        self.mutations.get(&mutation).cloned().unwrap_or_default()
    }

    fn mutation_mut(&mut self, mutation: Mutation) -> &mut OperationStatus {
        self.mutations.entry(mutation).or_default()
    }

    /// Add a created record unless one with the same id is already listed
    fn prepend(&mut self, record: Value) {
        let exists = envelope::record_id(&record)
            .map(|id| {
                self.items
                    .iter()
                    .any(|item| envelope::record_id(item) == Some(id))
            })
            .unwrap_or(false);
        if !exists {
            self.items.insert(0, record);
        }
    }

    /// Shallow-merge an updated record into the listed one with the same id
    fn merge(&mut self, id: &str, record: Value) {
        let Value::Object(fields) = record else {
            return;
        };
        let target = ["_id", "id"]
            .iter()
            .find_map(|key| match fields.get(*key) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| id.to_string());
        if let Some(Value::Object(existing)) = self
            .items
            .iter_mut()
            .find(|item| envelope::id_matches(item, &target))
        {
            existing.extend(fields);
        }
    }
}

/// How a successful mutation is reflected in the cached list
#[derive(Debug, Clone)]
pub(crate) enum Apply {
    Prepend,
    Merge(String),
}

/// One tracked write
pub(crate) struct MutationRequest<'a> {
    pub mutation: Mutation,
    pub method: Method,
    pub path: String,
    pub body: &'a Value,
    pub failure: &'static str,
    pub apply: Apply,
    /// Record assumed when the response has none
    pub echo: Option<Value>,
}

/// Lazily fetched list of records of one entity
#[derive(Clone)]
pub struct Collection {
    entity: Entity,
    client: Arc<AuthClient>,
    state: Arc<RwLock<CollectionState>>,
}

impl Collection {
    pub fn new(entity: Entity, client: Arc<AuthClient>) -> Self {
        Self {
            entity,
            client,
            state: Arc::new(RwLock::new(CollectionState::default())),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn state(&self) -> CollectionState {
        self.state.read().clone()
    }

    /// Session kind whose token the next call carries
    ///
    /// Mirrors the route guard: the dashboard opens for either kind, so the
    /// call speaks for the admin session when it holds a token, else the user
    /// session. With neither, the admin kind goes out unauthenticated.
    pub fn kind(&self) -> SessionKind {
        [SessionKind::Admin, SessionKind::User]
            .into_iter()
            .find(|kind| self.client.token(*kind).is_some())
            .unwrap_or(SessionKind::Admin)
    }

    pub fn items(&self) -> Vec<Value> {
        self.state.read().items.clone()
    }

    /// Fetch the list, replacing the cached one on success
    pub async fn fetch(&self) -> Result<Vec<Value>> {
        self.state.write().fetch.start();

        match self.client.get(self.kind(), self.entity.path()).await {
            Ok(payload) => {
                let items = envelope::unwrap_list(self.entity, &payload).unwrap_or_else(|| {
                    tracing::warn!(entity = self.entity.label(), "Unrecognized list shape, showing empty list");
                    Vec::new()
                });
                let mut state = self.state.write();
                state.items = items.clone();
                state.fetch.succeed();
                tracing::debug!(entity = self.entity.label(), count = items.len(), "Fetched records");
                Ok(items)
            }
            Err(e) => {
                let fallback = format!("Failed to fetch {}", self.entity.label());
                self.state.write().fetch.fail(e.user_message(&fallback));
                Err(e)
            }
        }
    }

    /// Fetch only when the list was never loaded or the last fetch failed
    pub async fn ensure_loaded(&self) -> Result<Vec<Value>> {
        if self.state.read().fetch.needs_fetch() {
            self.fetch().await
        } else {
            Ok(self.items())
        }
    }

    pub(crate) async fn mutate(&self, request: MutationRequest<'_>) -> Result<Value> {
        self.state.write().mutation_mut(request.mutation).start();

        let result = self
            .client
            .request(self.kind(), request.method, &request.path, Some(request.body))
            .await;

        match result {
            Ok(payload) => {
                // Id-less bodies ({"message": "ok"}) are acknowledgements, not records
                let record = envelope::unwrap_record(self.entity, &payload)
                    .filter(|r| envelope::record_id(r).is_some())
                    .or(request.echo);
                let mut state = self.state.write();
                if let Some(record) = record {
                    match request.apply {
                        Apply::Prepend => state.prepend(record),
                        Apply::Merge(id) => state.merge(&id, record),
                    }
                }
                state.mutation_mut(request.mutation).succeed();
                Ok(payload)
            }
            Err(e) => {
                let message = e.user_message(request.failure);
                tracing::info!(
                    entity = self.entity.label(),
                    mutation = ?request.mutation,
                    error = %message,
                    "Mutation failed"
                );
                self.state
                    .write()
                    .mutation_mut(request.mutation)
                    .fail(message);
                Err(e)
            }
        }
    }
}
