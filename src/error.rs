//! Error types shared by the session store, API helpers and transports.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. Screens render `Display` output inline, so the
//! messages on user-facing variants are written for end users.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure below HTTP: the request never produced a status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0} ms")]
    Timeout(u32),
    #[error("network error: {0}")]
    Network(String),
    #[error("http transport is not available in this build")]
    Unavailable,
}

/// Errors from session operations and the authenticated request wrapper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Local validation failed; the backend was never contacted.
    #[error("{0}")]
    Invalid(String),
    /// The backend refused the credentials or registration payload.
    #[error("{0}")]
    Rejected(String),
    /// A wrapped request came back 401 and the session was torn down.
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
    #[error("Could not reach the server ({0}).")]
    Network(#[from] TransportError),
    #[error("Another sign-in request is already in progress.")]
    Busy,
    /// A logout happened while the call was in flight; its result was dropped.
    #[error("The request was cancelled because you signed out.")]
    Superseded,
    #[error("unexpected response from server: {0}")]
    Decode(String),
}

/// Errors from the typed API helpers in `net::api`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Administrator permission is required.")]
    Forbidden,
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// True when the failure already forced a logout.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Auth(AuthError::SessionExpired))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive number of milliseconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("browser storage is unavailable")]
    Unavailable,
    #[error("browser storage rejected the write: {0}")]
    Write(String),
}
