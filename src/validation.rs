//! Form-field rules shared by the register, profile and login screens.
//!
//! Each rule returns the message to show next to the offending field. Forms
//! collect them into [`FieldErrors`]; nothing that fails here is sent to the
//! backend.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::collections::BTreeMap;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Per-field error messages keyed by the wire name of the field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn check(&mut self, field: &'static str, result: Result<(), &'static str>) {
        if let Err(message) = result {
            self.0.entry(field).or_insert(message);
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// First message in field order, for single-line banners.
    #[must_use]
    pub fn first(&self) -> Option<&'static str> {
        self.0.values().next().copied()
    }
}

/// Registration username: required, at least three characters.
pub fn username(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Enter a username.");
    }
    if value.chars().count() < MIN_USERNAME_LEN {
        return Err("Username must be at least 3 characters.");
    }
    Ok(())
}

/// Profile username: the registration rule plus `[A-Za-z0-9_-]` only.
pub fn profile_username(value: &str) -> Result<(), &'static str> {
    username(value)?;
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err("Username may only contain letters, digits, underscores and hyphens.");
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("Enter a password.");
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    Ok(())
}

pub fn current_password(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("Enter your current password.");
    }
    Ok(())
}

pub fn password_confirmation(password: &str, confirmation: &str) -> Result<(), &'static str> {
    if confirmation.is_empty() {
        return Err("Confirm the password.");
    }
    if password != confirmation {
        return Err("Passwords do not match.");
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Enter an email address.");
    }
    if !is_email_shaped(value) {
        return Err("Enter a valid email address.");
    }
    Ok(())
}

pub fn display_name(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Enter a display name.");
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // At least one dot with non-empty text on both sides of some dot.
    domain
        .match_indices('.')
        .any(|(idx, _)| idx > 0 && idx + 1 < domain.len())
}
