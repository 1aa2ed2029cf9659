// Aspire session and authorization layer
//
// This crate is the client side of the Aspire job-board admin API: it keeps
// the user and admin sessions, attaches their tokens to outgoing requests,
// and reacts to rejected sessions.
//
// Key design decisions:
// - Two independent session kinds (user, admin); each owns one credential slot
// - The call site names the session kind whose token a request carries
// - A 401 from a non-identity endpoint ends every session and redirects to login
// - Persistence and navigation sit behind traits (CredentialStore, Navigator)
// - Everything hangs off an explicit SessionService; no global state
// - Server payloads stay serde_json::Value; only token, profile, and ids are read

pub mod client;
pub mod config;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod forms;
pub mod guard;
pub mod navigation;
pub mod records;
pub mod service;
pub mod session;
pub mod session_kind;
pub mod status;

// Logging setup shared by front ends
pub mod telemetry;

// Re-exports for convenience
pub use client::{is_identity_endpoint, AuthClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use envelope::Entity;
pub use error::{ClientError, Result};
pub use guard::{GuardDecision, RouteGuard};
pub use navigation::{NavigationReason, Navigator, RecordingNavigator, Route};
pub use records::{Admins, Collection, CollectionState, Jobs, Mutation, NewAdmin, NewJob, PasswordChange};
pub use service::SessionService;
pub use session::{Credentials, SessionContainer, SessionState};
pub use session_kind::{SessionKind, SessionToken};
pub use status::{OperationStatus, Phase};
