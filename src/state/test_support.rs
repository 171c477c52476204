//! Fakes shared by session, store, router and API tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::net::http::{ApiRequest, ApiResponse, Transport};
use crate::net::types::{Role, User};
use crate::state::storage::MemoryStorage;
use crate::state::store::SessionStore;

pub type TestStore = SessionStore<ScriptedTransport, MemoryStorage>;

pub fn make_user(role: Role) -> User {
    User {
        id: 1,
        username: "taro".to_owned(),
        display_name: "Taro".to_owned(),
        email: "taro@example.com".to_owned(),
        role,
        enabled: true,
        login_failed_attempts: 0,
        account_locked_until: None,
        last_login_at: None,
    }
}

pub fn user_json(role: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "username": "taro",
        "displayName": "Taro",
        "email": "taro@example.com",
        "role": role,
        "enabled": true,
        "loginFailedAttempts": 0
    })
}

/// Replays queued responses in order and records every request it receives.
/// Once the queue is empty it fails with a network error.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<ApiResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send waits for one `notify_one` on the returned handle.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (Self { gate: Some(Arc::clone(&gate)), ..Self::default() }, gate)
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push(Ok(ApiResponse::new(status, body.to_string())))
    }

    pub fn push_status(&self, status: u16) -> &Self {
        self.push(Ok(ApiResponse::new(status, "")))
    }

    pub fn push_error(&self, error: TransportError) -> &Self {
        self.push(Err(error))
    }

    fn push(&self, response: Result<ApiResponse, TransportError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests().last().cloned().expect("no request was sent")
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_owned())))
    }
}

pub fn make_store(transport: &ScriptedTransport, storage: &MemoryStorage) -> TestStore {
    SessionStore::new(transport.clone(), storage.clone(), ClientConfig::default())
}

/// Store already signed in as `role` with token `t1`.
pub async fn signed_in_store(transport: &ScriptedTransport, storage: &MemoryStorage, role: &str) -> TestStore {
    let store = make_store(transport, storage);
    transport.push_json(200, serde_json::json!({"token": "t1", "userInfo": user_json(role)}));
    store
        .login(&crate::net::types::Credentials::new("taro", "secret1"))
        .await
        .expect("scripted login should succeed");
    store
}
