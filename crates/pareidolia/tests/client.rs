//! Integration tests for the full client: builder, login flow, guards, and
//! forced logout, over a scripted transport.

use std::collections::VecDeque;
use std::sync::Arc;

use pareidolia::prelude::*;
use pareidolia::session::{CredentialStore, FileStorage, MemoryStorage, ROLE_KEY, TOKEN_KEY};
use pareidolia::transport::{ApiRequest, ApiResponse, HttpTransport, TransportError};
use parking_lot::Mutex;

// =========================================================================
// Scripted transport
// =========================================================================

/// Answers by URL suffix; unmatched requests fail at the transport level.
#[derive(Default)]
struct Backend {
    routes: Mutex<Vec<(String, VecDeque<ApiResponse>)>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl Backend {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn on(&self, suffix: &str, status: u16, body: &str) {
        let mut routes = self.routes.lock();
        let response = ApiResponse::new(status, body);
        match routes.iter_mut().find(|(s, _)| s == suffix) {
            Some((_, queue)) => queue.push_back(response),
            None => routes.push((suffix.to_string(), VecDeque::from([response]))),
        }
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| r.url().to_string())
            .collect()
    }
}

impl HttpTransport for Backend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = request.url().to_string();
        self.requests.lock().push(request);
        let mut routes = self.routes.lock();
        routes
            .iter_mut()
            .find(|(suffix, queue)| url.ends_with(suffix.as_str()) && !queue.is_empty())
            .and_then(|(_, queue)| queue.pop_front())
            .ok_or_else(|| TransportError::SendFailed(format!("unscripted: {url}")))
    }
}

const PROMOTER_LOGIN: &str = r#"{"authToken":"abc123","id":12,"email":"pro@p.io","name":"Pia","surname":"Rossi","phone":"555","referenceType":"PROMOTER"}"#;
const PROMOTER: &str = r#"{"id":12,"email":"pro@p.io","name":"Pia","surname":"Rossi","phone":"555","referenceType":"PROMOTER"}"#;
const CONSUMER: &str = r#"{"id":3,"email":"c@p.io","name":"Cai","surname":"Li","phone":"1","referenceType":"CONSUMER"}"#;

fn client_with(
    backend: &Arc<Backend>,
    storage: Arc<dyn CredentialStore>,
) -> PareidoliaClient<Arc<Backend>> {
    PareidoliaClient::builder()
        .config(ClientConfig {
            api_url: "http://api.test".into(),
            ..ClientConfig::default()
        })
        .storage(storage)
        .build_with_transport(backend.clone())
        .unwrap()
}

// =========================================================================
// Startup
// =========================================================================

#[tokio::test]
async fn test_startup_without_credentials_sends_nothing() {
    let backend = Backend::new();
    let client = client_with(&backend, Arc::new(MemoryStorage::new()));

    client.wait_until_ready().await;

    assert!(!client.store().is_logged_in());
    assert_eq!(client.store().state(), SessionState::Absent);
    assert!(backend.urls().is_empty());
}

#[tokio::test]
async fn test_startup_restores_session_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    FileStorage::open(&path)
        .unwrap()
        .set_many(&[(TOKEN_KEY, "abc123"), (ROLE_KEY, "PROMOTER")])
        .unwrap();
    let backend = Backend::new();
    backend.on("/promoter/data", 200, PROMOTER);

    let client = PareidoliaClient::builder()
        .config(ClientConfig {
            api_url: "http://api.test".into(),
            storage_path: Some(path),
            ..ClientConfig::default()
        })
        .build_with_transport(backend.clone())
        .unwrap();
    client.wait_until_ready().await;

    let identity = client.current_identity().unwrap();
    assert_eq!(identity.role(), Role::Promoter);
    assert_eq!(identity.display_name(), "Pia Rossi");
    assert_eq!(backend.urls(), vec!["http://api.test/promoter/data".to_string()]);
}

#[tokio::test]
async fn test_startup_with_revoked_token_clears_pair() {
    let storage = Arc::new(MemoryStorage::with_entries([
        (TOKEN_KEY, "old"),
        (ROLE_KEY, "CONSUMER"),
    ]));
    let backend = Backend::new();
    backend.on("/consumer/data", 401, r#"{"status":401,"message":"Unauthorized"}"#);

    let client = client_with(&backend, storage.clone());
    client.wait_until_ready().await;

    assert_eq!(client.store().state(), SessionState::Absent);
    assert!(storage.is_empty());
}

// =========================================================================
// Login and guards
// =========================================================================

#[tokio::test]
async fn test_login_promoter_then_guards() {
    let backend = Backend::new();
    backend.on("/generic/access/login", 200, PROMOTER_LOGIN);
    backend.on("/promoter/data", 200, PROMOTER);
    let storage = Arc::new(MemoryStorage::new());
    let client = client_with(&backend, storage.clone());
    client.wait_until_ready().await;

    let identity = client.login("pro@p.io", "secret").await.unwrap();

    assert_eq!(identity.role(), Role::Promoter);
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc123"));
    assert_eq!(storage.get(ROLE_KEY).as_deref(), Some("PROMOTER"));
    assert_eq!(client.router().location(), "/");

    let handle = client.store().handle();
    assert_eq!(
        Guard::RequireRole(Role::Admin).can_enter(handle).await,
        GuardOutcome::Redirect("/auth/login".to_string())
    );
    assert_eq!(
        Guard::RequireAuthenticated.can_enter(handle).await,
        GuardOutcome::Allow
    );

    let nav = client.navigate("/promoter/events/7").await.unwrap();
    assert_eq!(nav.path, "/promoter/events/7");
    assert_eq!(nav.param("id"), Some("7"));
}

#[tokio::test]
async fn test_login_bad_password_stays_anonymous() {
    let backend = Backend::new();
    backend.on(
        "/generic/access/login",
        401,
        r#"{"status":401,"message":"Bad credentials"}"#,
    );
    let client = client_with(&backend, Arc::new(MemoryStorage::new()));
    client.wait_until_ready().await;

    let err = client.login("pro@p.io", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Bad credentials");
    assert_eq!(client.current_identity(), None);
}

#[tokio::test]
async fn test_login_empty_token_is_missing_token() {
    let backend = Backend::new();
    backend.on(
        "/generic/access/login",
        200,
        r#"{"authToken":"","id":3,"email":"c@p.io","referenceType":"CONSUMER"}"#,
    );
    let client = client_with(&backend, Arc::new(MemoryStorage::new()));
    client.wait_until_ready().await;

    let err = client.login("c@p.io", "pw").await.unwrap_err();

    assert!(matches!(err, PareidoliaError::MissingToken));
    assert_eq!(client.store().state(), SessionState::Absent);
}

// =========================================================================
// Forced logout
// =========================================================================

#[tokio::test]
async fn test_401_on_promoter_call_forces_logout_and_redirect() {
    let backend = Backend::new();
    backend.on("/generic/access/login", 200, PROMOTER_LOGIN);
    backend.on("/promoter/data", 200, PROMOTER);
    backend.on(
        "/promoter/event/list",
        401,
        r#"{"timestamp":"2024-06-01T12:00:00","status":401,"message":"Token expired"}"#,
    );
    let storage = Arc::new(MemoryStorage::new());
    let client = client_with(&backend, storage.clone());
    client.wait_until_ready().await;
    client.login("pro@p.io", "secret").await.unwrap();
    client.navigate("/promoter/events").await.unwrap();
    let mut location = client.router().subscribe();

    let err = client.promoter().events(None).await.unwrap_err();

    let SessionError::Rejected(payload) = &err else {
        panic!("expected the normalized payload, got {err:?}");
    };
    assert_eq!(payload.message, "Token expired");
    assert_eq!(payload.status, Some(401));
    assert_eq!(client.store().state(), SessionState::Absent);
    assert!(storage.is_empty());

    location.changed().await.unwrap();
    assert_eq!(*location.borrow(), "/auth/login");
}

#[tokio::test]
async fn test_logout_clears_session_and_goes_home() {
    let backend = Backend::new();
    backend.on("/consumer/data", 200, CONSUMER);
    let storage = Arc::new(MemoryStorage::new());
    let client = client_with(&backend, storage.clone());
    client.wait_until_ready().await;
    client
        .store()
        .set_token("tok", Role::Consumer)
        .await
        .unwrap();
    client.navigate("/profile").await.unwrap();

    let nav = client.logout().await.unwrap();

    assert_eq!(nav.path, "/");
    assert!(storage.is_empty());
    assert_eq!(client.current_identity(), None);

    // The profile page is closed again.
    let nav = client.navigate("/profile").await.unwrap();
    assert_eq!(nav.path, "/auth/login");
}

// =========================================================================
// Configured routes
// =========================================================================

#[tokio::test]
async fn test_configured_login_and_home_routes_reach_guards_and_gateway() {
    let backend = Backend::new();
    backend.on("/generic/access/login", 200, PROMOTER_LOGIN);
    backend.on("/promoter/data", 200, PROMOTER);
    backend.on("/promoter/event/list", 401, r#"{"status":401,"message":"Expired"}"#);
    let client = PareidoliaClient::builder()
        .config(ClientConfig {
            api_url: "http://api.test".into(),
            login_route: "/signin".into(),
            home_route: "/welcome".into(),
            ..ClientConfig::default()
        })
        .storage(Arc::new(MemoryStorage::new()))
        .build_with_transport(backend.clone())
        .unwrap();
    client.wait_until_ready().await;

    let nav = client.navigate("/profile").await.unwrap();
    assert_eq!(nav.path, "/signin");
    assert!(!nav.not_found);

    client.login("pro@p.io", "secret").await.unwrap();
    assert_eq!(client.router().location(), "/welcome");

    // Logged in, so the login page sends the user home.
    let nav = client.navigate("/signin").await.unwrap();
    assert_eq!(nav.path, "/welcome");

    let mut location = client.router().subscribe();
    location.borrow_and_update();
    client.promoter().events(None).await.unwrap_err();

    location.changed().await.unwrap();
    assert_eq!(*location.borrow(), "/signin");
}
