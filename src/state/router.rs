//! In-app view routing with an authentication and role gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app has no URL router. The active screen is a closed [`View`] enum held
//! in a signal; `App` calls [`ViewRouter::sync`] whenever the session changes,
//! and every nav button goes through [`ViewRouter::navigate`]. The hash in the
//! address bar mirrors the active view so a reload lands on the same screen.
//!
//! RULES
//! =====
//! - Signed out on an authenticated view -> `Landing`.
//! - Signed in on a public view -> `Search`.
//! - `Admin` without the ADMIN role -> `Search`.
//!
//! Rules are not applied while the session is loading; the pending view is
//! kept and gated once validation settles.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use super::session::Session;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Landing,
    Login,
    Register,
    Search,
    RegisterProperty,
    Profile,
    Admin,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Landing,
        View::Login,
        View::Register,
        View::Search,
        View::RegisterProperty,
        View::Profile,
        View::Admin,
    ];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Login => "login",
            Self::Register => "register",
            Self::Search => "search",
            Self::RegisterProperty => "register-property",
            Self::Profile => "profile",
            Self::Admin => "admin",
        }
    }

    /// Inverse of [`Self::slug`]. Anything unrecognised opens `Search`.
    #[must_use]
    pub fn from_slug(slug: &str) -> Self {
        match slug.trim().to_ascii_lowercase().as_str() {
            "landing" => Self::Landing,
            "login" => Self::Login,
            "register" => Self::Register,
            "search" => Self::Search,
            "register-property" => Self::RegisterProperty,
            "profile" => Self::Profile,
            "admin" => Self::Admin,
            _ => Self::Search,
        }
    }

    /// View named by a location hash such as `#/profile`; `None` when empty.
    #[must_use]
    pub fn from_hash(hash: &str) -> Option<Self> {
        let slug = hash.trim_start_matches('#').trim_start_matches('/');
        if slug.trim().is_empty() { None } else { Some(Self::from_slug(slug)) }
    }

    #[must_use]
    pub fn hash(self) -> String {
        format!("#/{}", self.slug())
    }

    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Landing | Self::Login | Self::Register)
    }

    #[must_use]
    pub fn requires_auth(self) -> bool {
        !self.is_public()
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Landing => "Welcome",
            Self::Login => "Log in",
            Self::Register => "Create account",
            Self::Search => "Properties",
            Self::RegisterProperty => "Register property",
            Self::Profile => "Profile",
            Self::Admin => "User management",
        }
    }
}

/// What the root component renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Loading,
    View(View),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewRouter {
    active: View,
}

impl ViewRouter {
    #[must_use]
    pub fn new(initial: View) -> Self {
        Self { active: initial }
    }

    #[must_use]
    pub fn active(&self) -> View {
        self.active
    }

    #[must_use]
    pub fn screen(&self, session: &Session) -> Screen {
        if session.is_loading() { Screen::Loading } else { Screen::View(self.active) }
    }

    /// Apply the gate rules. Returns the new view when it changed.
    pub fn sync(&mut self, session: &Session) -> Option<View> {
        if session.is_loading() {
            return None;
        }
        let target = gate(self.active, session);
        if target == self.active {
            return None;
        }
        log::debug!("view {} -> {}", self.active.slug(), target.slug());
        self.active = target;
        Some(target)
    }

    /// User-triggered move; gated targets are redirected.
    pub fn navigate(&mut self, target: View, session: &Session) -> View {
        self.active = target;
        self.sync(session);
        self.active
    }
}

fn gate(view: View, session: &Session) -> View {
    if !session.is_authenticated() {
        return if view.requires_auth() { View::Landing } else { view };
    }
    if view.is_public() {
        return View::Search;
    }
    if view == View::Admin && !session.is_admin() {
        return View::Search;
    }
    view
}
