// Integration tests for login, logout, and forced session expiry
//
// These tests drive SessionService against a wiremock server so the full
// path (container -> client -> HTTP -> interception -> store) is exercised.
//
// Run with: cargo test -p aspire-core --test session_flow_test

use aspire_core::{
    ClientConfig, ClientError, CredentialStore, Credentials, FileCredentialStore, GuardDecision,
    MemoryCredentialStore, NavigationReason, Phase, RecordingNavigator, Route, SessionKind,
    SessionService, SessionToken,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    server: MockServer,
    store: Arc<MemoryCredentialStore>,
    navigator: Arc<RecordingNavigator>,
    service: SessionService,
}

async fn setup() -> Harness {
    setup_with(|_| {}).await
}

/// Start a mock API and a service, seeding the store before init
async fn setup_with(seed: impl FnOnce(&MemoryCredentialStore)) -> Harness {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    seed(&store);
    let navigator = Arc::new(RecordingNavigator::new());
    let service = SessionService::init(
        ClientConfig::new(server.uri()),
        store.clone(),
        navigator.clone(),
    )
    .unwrap();

    Harness {
        server,
        store,
        navigator,
        service,
    }
}

fn token(raw: &str) -> SessionToken {
    SessionToken::new(raw).unwrap()
}

#[tokio::test]
async fn test_admin_login_persists_and_authorizes_next_call() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admins/login"))
        .and(body_json(json!({"email": "a@b.com", "password": "x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t1",
            "admin": {"_id": "1", "fullname": "A"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/admins"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"_id": "1"}])))
        .expect(1)
        .mount(&h.server)
        .await;

    let admin = h.service.session(SessionKind::Admin);
    let profile = admin
        .login(&Credentials::new("a@b.com", "x"))
        .await
        .unwrap();

    assert_eq!(profile, Some(json!({"_id": "1", "fullname": "A"})));
    assert_eq!(h.store.get(SessionKind::Admin), Some(token("t1")));
    assert_eq!(h.store.get(SessionKind::User), None);

    let state = admin.state();
    assert!(state.is_authenticated());
    assert_eq!(state.login.phase, Phase::Succeeded);
    assert_eq!(state.profile.unwrap()["fullname"], "A");

    assert_eq!(h.service.navigate(Route::Dashboard), GuardDecision::Allow);

    let admins = h.service.admins().fetch().await.unwrap();
    assert_eq!(admins.len(), 1);
}

#[tokio::test]
async fn test_user_login_then_profile_check_carries_token() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/user/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"token": "u1", "user": {"_id": "9"}}})),
        )
        .mount(&h.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/auth/me"))
        .and(header("authorization", "Bearer u1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"_id": "9", "email": "u@b.com"}})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let user = h.service.session(SessionKind::User);
    let profile = user
        .login(&Credentials::new("u@b.com", "pw"))
        .await
        .unwrap();
    assert_eq!(profile, Some(json!({"_id": "9"})));
    assert_eq!(h.store.get(SessionKind::User), Some(token("u1")));

    let profile = user.fetch_profile().await.unwrap();
    assert_eq!(profile.unwrap()["email"], "u@b.com");
    assert_eq!(user.state().profile_fetch.phase, Phase::Succeeded);
}

#[tokio::test]
async fn test_login_without_token_fails() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admins/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&h.server)
        .await;

    let admin = h.service.session(SessionKind::Admin);
    let err = admin
        .login(&Credentials::new("a@b.com", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { .. }));
    let state = admin.state();
    assert!(!state.is_authenticated());
    assert_eq!(state.login.phase, Phase::Failed);
    assert_eq!(
        state.login.error.as_deref(),
        Some("Login response did not include a token")
    );
    assert_eq!(h.store.get(SessionKind::Admin), None);
}

#[tokio::test]
async fn test_rejected_login_is_a_form_error_not_an_expiry() {
    let h = setup_with(|store| store.set(SessionKind::User, &token("u1"))).await;

    Mock::given(method("POST"))
        .and(path("/api/admins/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&h.server)
        .await;

    let admin = h.service.session(SessionKind::Admin);
    let err = admin
        .login(&Credentials::new("a@b.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    assert_eq!(
        admin.state().login.error.as_deref(),
        Some("Invalid credentials")
    );

    // The other kind's session survives
    assert!(h.navigator.history().is_empty());
    assert_eq!(h.store.get(SessionKind::User), Some(token("u1")));
    assert!(h.service.session(SessionKind::User).state().is_authenticated());
    assert_eq!(h.service.client().expiry_count(), 0);
}

#[tokio::test]
async fn test_unauthorized_data_call_ends_every_session() {
    let h = setup_with(|store| {
        store.set(SessionKind::User, &token("u1"));
        store.set(SessionKind::Admin, &token("a1"));
    })
    .await;

    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.service.jobs().fetch().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));

    for kind in SessionKind::ALL {
        assert_eq!(h.store.get(kind), None, "{kind} slot should be wiped");
        assert_eq!(h.service.client().token(kind), None);
        assert!(!h.service.session(kind).state().is_authenticated());
    }

    assert!(h.navigator.session_expired());
    assert_eq!(
        h.navigator.last(),
        Some((Route::Login, NavigationReason::SessionExpired))
    );
    assert_eq!(h.service.client().expiry_count(), 1);

    let jobs = h.service.jobs().state();
    assert_eq!(jobs.fetch.phase, Phase::Failed);
    assert_eq!(jobs.fetch.error.as_deref(), Some("jwt expired"));

    assert_eq!(
        h.service.navigate(Route::Dashboard),
        GuardDecision::Deny {
            redirect: Route::Login
        }
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let h = setup_with(|store| store.set(SessionKind::Admin, &token("a1"))).await;

    Mock::given(method("POST"))
        .and(path("/api/admins/logout"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "bye"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let admin = h.service.session(SessionKind::Admin);
    admin.logout().await.unwrap();

    let state = admin.state();
    assert!(!state.is_authenticated());
    assert_eq!(state.logout.phase, Phase::Succeeded);
    assert_eq!(h.store.get(SessionKind::Admin), None);
    assert_eq!(h.service.client().token(SessionKind::Admin), None);
}

#[tokio::test]
async fn test_failed_logout_still_clears_locally() {
    let h = setup_with(|store| {
        store.set(SessionKind::User, &token("u1"));
        store.set(SessionKind::Admin, &token("a1"));
    })
    .await;

    Mock::given(method("POST"))
        .and(path("/api/admins/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&h.server)
        .await;

    let admin = h.service.session(SessionKind::Admin);
    let err = admin.logout().await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    let state = admin.state();
    assert!(!state.is_authenticated());
    assert_eq!(state.logout.phase, Phase::Failed);
    assert_eq!(state.logout.error.as_deref(), Some("boom"));
    assert_eq!(h.store.get(SessionKind::Admin), None);

    // Only the admin slot is touched
    assert_eq!(h.store.get(SessionKind::User), Some(token("u1")));
}

#[tokio::test]
async fn test_unreachable_logout_still_clears_locally() {
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(SessionKind::Admin, &token("a1"));
    let service = SessionService::init(
        ClientConfig::new("http://127.0.0.1:9"),
        store.clone(),
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();

    let admin = service.session(SessionKind::Admin);
    let err = admin.logout().await.unwrap_err();

    assert!(err.is_transport());
    assert!(!admin.state().is_authenticated());
    assert_eq!(store.get(SessionKind::Admin), None);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admins/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "late"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let service = SessionService::init(
        ClientConfig::new(server.uri()).with_request_timeout(Duration::from_millis(50)),
        store.clone(),
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();

    let admin = service.session(SessionKind::Admin);
    let err = admin
        .login(&Credentials::new("a@b.com", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Timeout(_)));
    assert_eq!(err.to_string(), "timeout of 50ms exceeded");
    assert_eq!(
        admin.state().login.error.as_deref(),
        Some("timeout of 50ms exceeded")
    );
    assert_eq!(store.get(SessionKind::Admin), None);
}

#[tokio::test]
async fn test_file_store_resumes_session_across_restarts() {
    let dir = std::env::temp_dir().join(format!("aspire-flow-{}", uuid::Uuid::now_v7()));
    let file = dir.join("credentials.json");
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/admins/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t1"})))
        .mount(&server)
        .await;

    let first = SessionService::init(
        ClientConfig::new(server.uri()),
        Arc::new(FileCredentialStore::new(&file)),
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();
    first
        .session(SessionKind::Admin)
        .login(&Credentials::new("a@b.com", "x"))
        .await
        .unwrap();
    first.dispose();

    let second = SessionService::init(
        ClientConfig::new(server.uri()),
        Arc::new(FileCredentialStore::new(&file)),
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();

    assert_eq!(
        second.session(SessionKind::Admin).token(),
        Some(token("t1"))
    );
    assert_eq!(second.navigate(Route::Dashboard), GuardDecision::Allow);

    let _ = std::fs::remove_dir_all(&dir);
}
