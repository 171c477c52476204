//! Session store: the single writer of authentication state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once in `App`, provided through Leptos context, and cloned into
//! every page that talks to the backend. Pages read snapshots and call the
//! operations here; nothing else mutates the token or user.
//!
//! INVARIANTS
//! ==========
//! - The persisted token changes only in `login`, `logout` and a failed
//!   `validate_on_load`.
//! - `login`, `register` and `validate_on_load` share one in-flight slot and
//!   hold `loading` for their whole duration, released on every exit path.
//! - `logout` advances the session epoch; sign-ins that started under an older
//!   epoch are discarded when they complete.
//! - Any 401 seen by `authenticated_fetch` tears the session down before the
//!   caller sees an error.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::net::http::{
    AUTHORIZATION, ApiRequest, ApiResponse, CONTENT_TYPE, JSON_CONTENT_TYPE, Transport, bearer,
};
use crate::net::types::{Credentials, LoginResponse, RegistrationRequest, User, ValidateResponse};
use crate::state::session::Session;
use crate::state::storage::TokenStorage;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const VALIDATE_PATH: &str = "/api/auth/validate";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const ME_PATH: &str = "/api/auth/me";

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const REGISTERED: &str = "Registration complete. Please log in.";
const ACCOUNT_FETCH_FAILED: &str = "Could not load your account.";

type Listener = Box<dyn Fn(&Session) + Send + Sync>;

/// Cloneable handle to the shared session state.
pub struct SessionStore<T, S> {
    inner: Arc<Inner<T, S>>,
}

struct Inner<T, S> {
    transport: T,
    storage: S,
    config: ClientConfig,
    session: RwLock<Session>,
    in_flight: AtomicBool,
    epoch: AtomicU64,
    listeners: RwLock<Vec<Listener>>,
}

impl<T, S> Clone for SessionStore<T, S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

/// Holds the in-flight slot and `loading` flag; releases both on drop.
struct CallGuard<'a, T, S> {
    store: &'a SessionStore<T, S>,
}

impl<T, S> Drop for CallGuard<'_, T, S> {
    fn drop(&mut self) {
        self.store.mutate(|s| s.set_loading(false));
        self.store.inner.in_flight.store(false, Ordering::SeqCst);
    }
}

impl<T, S> SessionStore<T, S> {
    /// New store in the `loading` state; call [`Self::validate_on_load`] next.
    pub fn new(transport: T, storage: S, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                storage,
                config,
                session: RwLock::new(Session::starting()),
                in_flight: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn current_session(&self) -> Session {
        self.inner.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Register a listener that receives every snapshot after a mutation.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    fn mutate(&self, f: impl FnOnce(&mut Session)) {
        let snapshot = {
            let mut session = self.inner.session.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut session);
            session.clone()
        };
        let listeners = self.inner.listeners.read().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(&snapshot);
        }
    }

    fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<CallGuard<'_, T, S>, AuthError> {
        if self
            .inner
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AuthError::Busy);
        }
        self.mutate(|s| s.set_loading(true));
        Ok(CallGuard { store: self })
    }

    /// Resolve the URL against the API base and apply the default timeout.
    fn prepare(&self, mut request: ApiRequest) -> ApiRequest {
        request.url = self.inner.config.resolve_url(&request.url);
        if request.timeout_ms.is_none() {
            request.timeout_ms = Some(self.inner.config.request_timeout_ms);
        }
        request
    }
}

impl<T: Transport, S: TokenStorage> SessionStore<T, S> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AuthError> {
        let request = self.prepare(request);
        Ok(self.inner.transport.send(request).await?)
    }

    /// Sign in with `credentials` and persist the issued token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Invalid`] for empty fields (no request is sent)
    /// - [`AuthError::Busy`] while another session call is in flight
    /// - [`AuthError::Rejected`] with the backend's message on non-2xx
    /// - [`AuthError::Network`] / [`AuthError::Decode`] on transport or body failures
    /// - [`AuthError::Superseded`] if a logout ran while the call was pending
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let credentials = credentials.validate().map_err(|m| AuthError::Invalid(m.to_owned()))?;
        {
            let _call = self.begin()?;
            self.login_call(&credentials).await?;
        }
        Ok(self.current_session())
    }

    async fn login_call(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let epoch = self.epoch();
        let request = ApiRequest::post(LOGIN_PATH)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(credentials)
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        let response = self.send(request).await?;
        if !response.is_success() {
            log::warn!("login rejected for {}: status {}", credentials.username, response.status);
            return Err(AuthError::Rejected(response.message_or(LOGIN_FAILED)));
        }
        let LoginResponse { token, user_info } =
            response.json::<LoginResponse>().map_err(|e| AuthError::Decode(e.to_string()))?;
        if self.epoch() != epoch {
            return Err(AuthError::Superseded);
        }
        if let Err(e) = self.inner.storage.save(&token) {
            log::warn!("token not persisted, session will not survive reload: {e}");
        }
        log::info!("signed in as {} ({})", user_info.username, user_info.role.as_str());
        self.mutate(|s| s.sign_in(token, user_info));
        Ok(())
    }

    /// Create an account. The caller stays signed out and is expected to log in.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::login`]; validation covers every field of `request`.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<String, AuthError> {
        if let Some(message) = request.field_errors().first() {
            return Err(AuthError::Invalid(message.to_owned()));
        }
        let _call = self.begin()?;
        let request = ApiRequest::post(REGISTER_PATH)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(request)
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        let response = self.send(request).await?;
        if !response.is_success() {
            log::warn!("registration rejected: status {}", response.status);
            return Err(AuthError::Rejected(response.message_or(REGISTER_FAILED)));
        }
        Ok(response.message_or(REGISTERED))
    }

    /// Tell the backend (best effort), then clear the session and stored token.
    pub async fn logout(&self) {
        let token = self.current_session().token().map(str::to_owned);
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);

        if let Some(token) = token {
            let request = ApiRequest::post(LOGOUT_PATH)
                .header(AUTHORIZATION, bearer(&token))
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
            match self.send(request).await {
                Ok(response) if response.is_success() => {}
                Ok(response) => log::warn!("logout notification returned status {}", response.status),
                Err(e) => log::warn!("logout notification failed: {e}"),
            }
        }

        self.inner.storage.remove();
        self.mutate(Session::sign_out);
        log::info!("session cleared");
    }

    /// Startup check of the persisted token. Always ends with `loading == false`.
    pub async fn validate_on_load(&self) {
        let Ok(_call) = self.begin() else {
            log::debug!("token validation skipped: another session call is in flight");
            return;
        };
        let epoch = self.epoch();

        let Some(token) = self.inner.storage.load() else {
            self.mutate(Session::sign_out);
            return;
        };

        match self.check_token(&token).await {
            Ok(user) if self.epoch() == epoch => {
                log::info!("restored session for {}", user.username);
                self.mutate(|s| s.sign_in(token, user));
            }
            Ok(_) => log::debug!("token validation finished after logout; result dropped"),
            Err(e) => {
                log::warn!("stored token discarded: {e}");
                self.inner.storage.remove();
                self.mutate(Session::sign_out);
            }
        }
    }

    async fn check_token(&self, token: &str) -> Result<User, AuthError> {
        let timeout_ms = self.inner.config.validate_timeout_ms;
        let request = ApiRequest::get(VALIDATE_PATH)
            .header(AUTHORIZATION, bearer(token))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .with_timeout(timeout_ms);
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(AuthError::Rejected(format!("validation returned status {}", response.status)));
        }
        let body: ValidateResponse = response.json().map_err(|e| AuthError::Decode(e.to_string()))?;
        if !body.valid {
            return Err(AuthError::Rejected("token is no longer valid".to_owned()));
        }
        if let Some(user) = body.user_info {
            return Ok(user);
        }

        // Older backends answer `{valid: true}` only; the user comes from /me.
        let request = ApiRequest::get(ME_PATH)
            .header(AUTHORIZATION, bearer(token))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .with_timeout(timeout_ms);
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(AuthError::Rejected(format!("user lookup returned status {}", response.status)));
        }
        response.json().map_err(|e| AuthError::Decode(e.to_string()))
    }

    /// Send `request` with the bearer token and JSON content type applied.
    ///
    /// Headers already on `request` win over the defaults. Every status except
    /// 401 is returned untouched.
    ///
    /// # Errors
    ///
    /// - [`AuthError::SessionExpired`] on 401, after the session was cleared
    /// - [`AuthError::Network`] when no response arrived
    pub async fn authenticated_fetch(&self, request: ApiRequest) -> Result<ApiResponse, AuthError> {
        let token = self.current_session().token().map(str::to_owned);
        let request = with_auth_defaults(request, token.as_deref());
        let target = format!("{} {}", request.method.as_str(), request.url);

        let response = self.send(request).await?;
        if response.status == 401 {
            log::warn!("{target} returned 401; ending session");
            self.logout().await;
            return Err(AuthError::SessionExpired);
        }
        Ok(response)
    }

    /// Overwrite the cached user after a successful profile change.
    pub fn replace_user(&self, user: User) {
        self.mutate(|s| {
            if !s.replace_user(user) {
                log::debug!("replace_user ignored: no active session");
            }
        });
    }

    /// Re-read the current user from `/api/auth/me` and cache it.
    ///
    /// # Errors
    ///
    /// Wrapper errors from [`Self::authenticated_fetch`], or
    /// [`AuthError::Rejected`] / [`AuthError::Decode`] for a bad answer.
    pub async fn refresh_user(&self) -> Result<User, AuthError> {
        let response = self.authenticated_fetch(ApiRequest::get(ME_PATH)).await?;
        if !response.is_success() {
            return Err(AuthError::Rejected(response.message_or(ACCOUNT_FETCH_FAILED)));
        }
        let user: User = response.json().map_err(|e| AuthError::Decode(e.to_string()))?;
        self.replace_user(user.clone());
        Ok(user)
    }
}

/// Defaults first, caller headers last so they override by name.
pub(crate) fn with_auth_defaults(mut request: ApiRequest, token: Option<&str>) -> ApiRequest {
    let caller_headers = std::mem::take(&mut request.headers);
    if let Some(token) = token {
        request.set_header(AUTHORIZATION, bearer(token));
    }
    request.set_header(CONTENT_TYPE, JSON_CONTENT_TYPE);
    for (name, value) in caller_headers {
        request.set_header(&name, value);
    }
    request
}
