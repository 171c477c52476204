//! Session flows against a local HTTP backend using the native transport.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};

use estate_client::config::ClientConfig;
use estate_client::error::{AuthError, TransportError};
use estate_client::net::http::{ApiRequest, NativeTransport};
use estate_client::net::types::{Credentials, Role};
use estate_client::state::storage::MemoryStorage;
use estate_client::state::store::SessionStore;

const TOKEN: &str = "tok-guest";

type Store = SessionStore<NativeTransport, MemoryStorage>;

// =============================================================================
// Mock backend
// =============================================================================

fn guest_json() -> Value {
    json!({
        "id": 7,
        "username": "guest",
        "displayName": "Guest",
        "email": "guest@example.com",
        "role": "GUEST",
        "enabled": true,
        "loginFailedAttempts": 0
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {TOKEN}");
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "guest" && body["password"] == "guest123" {
        (StatusCode::OK, Json(json!({ "token": TOKEN, "userInfo": guest_json() })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid username or password" })))
    }
}

async fn validate(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if authorized(&headers) {
        (StatusCode::OK, Json(json!({ "valid": true, "userInfo": guest_json() })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "valid": false })))
    }
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if authorized(&headers) {
        (StatusCode::OK, Json(guest_json()))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({})))
    }
}

async fn logout() -> StatusCode {
    StatusCode::OK
}

async fn expired() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "token expired" })))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!([]))
}

async fn start_backend() -> SocketAddr {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/validate", get(validate))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/api/expired", get(expired))
        .route("/api/slow", get(slow));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn store_for(addr: SocketAddr, storage: MemoryStorage) -> Store {
    let config = ClientConfig {
        api_base_url: format!("http://{addr}"),
        request_timeout_ms: 300,
        ..ClientConfig::default()
    };
    SessionStore::new(NativeTransport::default(), storage, config)
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn guest_login_then_validate_keeps_session() {
    let addr = start_backend().await;
    let storage = MemoryStorage::default();
    let store = store_for(addr, storage.clone());

    let session = store.login(&Credentials::guest()).await.unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.role(), Some(Role::Guest));
    assert_eq!(storage.peek().as_deref(), Some(TOKEN));

    store.validate_on_load().await;
    let session = store.current_session();
    assert!(session.is_authenticated());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn wrong_password_surfaces_backend_message() {
    let addr = start_backend().await;
    let store = store_for(addr, MemoryStorage::default());

    let err = store.login(&Credentials::new("guest", "nope")).await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(ref m) if m == "Invalid username or password"));
    assert!(!store.current_session().is_authenticated());
}

#[tokio::test]
async fn stored_token_is_restored_on_reload() {
    let addr = start_backend().await;
    let store = store_for(addr, MemoryStorage::with_token(TOKEN));
    assert!(store.current_session().is_loading());

    store.validate_on_load().await;
    let session = store.current_session();
    assert!(!session.is_loading());
    assert_eq!(session.token(), Some(TOKEN));
    assert_eq!(session.user().map(|u| u.username.as_str()), Some("guest"));
}

#[tokio::test]
async fn stale_token_is_discarded_on_reload() {
    let addr = start_backend().await;
    let storage = MemoryStorage::with_token("stale");
    let store = store_for(addr, storage.clone());

    store.validate_on_load().await;
    assert!(!store.current_session().is_authenticated());
    assert!(!store.current_session().is_loading());
    assert_eq!(storage.peek(), None);
}

#[tokio::test]
async fn unauthorized_response_ends_session() {
    let addr = start_backend().await;
    let storage = MemoryStorage::default();
    let store = store_for(addr, storage.clone());
    store.login(&Credentials::guest()).await.unwrap();

    let err = store.authenticated_fetch(ApiRequest::get("/api/expired")).await.unwrap_err();
    assert!(matches!(err, AuthError::SessionExpired));
    assert!(!store.current_session().is_authenticated());
    assert_eq!(storage.peek(), None);
}

#[tokio::test]
async fn authenticated_fetch_sends_bearer_token() {
    let addr = start_backend().await;
    let store = store_for(addr, MemoryStorage::default());
    store.login(&Credentials::guest()).await.unwrap();

    let response = store.authenticated_fetch(ApiRequest::get("/api/auth/me")).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.json::<Value>().unwrap()["username"], "guest");
}

#[tokio::test]
async fn slow_backend_times_out_without_ending_session() {
    let addr = start_backend().await;
    let store = store_for(addr, MemoryStorage::default());
    store.login(&Credentials::guest()).await.unwrap();

    let err = store.authenticated_fetch(ApiRequest::get("/api/slow")).await.unwrap_err();
    assert!(matches!(err, AuthError::Network(TransportError::Timeout(300))));
    assert!(store.current_session().is_authenticated());
}
