//! Page modules, one per `View`.
//!
//! ARCHITECTURE
//! ============
//! Each page owns its form state and async orchestration and talks to the
//! backend only through the `SessionStore` in context. Pure form logic lives
//! next to each page so it can be tested without a reactive runtime.

pub mod admin;
pub mod landing;
pub mod login;
pub mod profile;
pub mod property_form;
pub mod register;
pub mod search;

use crate::app::Flash;
use crate::error::ApiError;

/// Inline text for `err`. An expired session also goes to the flash banner,
/// because the router is about to unmount the page.
pub(crate) fn api_error_text(err: &ApiError, flash: Flash) -> String {
    let text = err.to_string();
    if err.is_session_expired() {
        flash.error(text.clone());
    }
    text
}
