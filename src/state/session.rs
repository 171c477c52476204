//! Authentication snapshot for the current browser user.
//!
//! DESIGN
//! ======
//! Token and user travel together in one `Option<Identity>`, so a session can
//! never be "authenticated" with only one of them present. Mutation is
//! crate-private; the rest of the app only sees snapshots handed out by
//! `SessionStore`.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::{Role, User};

/// Bearer token plus the user it was issued to.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    identity: Option<Identity>,
    loading: bool,
}

impl Session {
    /// Empty session waiting for startup validation.
    #[must_use]
    pub fn starting() -> Self {
        Self { identity: None, loading: true }
    }

    #[must_use]
    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self { identity: Some(Identity { token: token.into(), user }), loading: false }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.identity.as_ref().map(|i| &i.user)
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub(crate) fn sign_in(&mut self, token: String, user: User) {
        self.identity = Some(Identity { token, user });
    }

    pub(crate) fn sign_out(&mut self) {
        self.identity = None;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Overwrite the cached user. Returns `false` when nobody is signed in.
    pub(crate) fn replace_user(&mut self, user: User) -> bool {
        match self.identity.as_mut() {
            Some(identity) => {
                identity.user = user;
                true
            }
            None => false,
        }
    }
}
