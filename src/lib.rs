//! # estate-client
//!
//! Leptos + WASM frontend for the real-estate investment manager: sign-in,
//! property search and registration, profile editing, and user administration
//! on top of a remote JSON API.
//!
//! The authentication session (`state::store`) is the core of the crate. Every
//! network-calling page goes through its authenticated request wrapper, and the
//! view router (`state::router`) derives the active screen from it.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod finance;
pub mod logging;
pub mod net;
pub mod pages;
pub mod state;
pub mod validation;

/// Browser entry point: installs panic/log hooks and hydrates the root view.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let config = config::ClientConfig::from_build_env().unwrap_or_else(|e| {
        leptos::logging::warn!("invalid build configuration, using defaults: {e}");
        config::ClientConfig::default()
    });
    logging::init(config.log_level);
    leptos::mount::hydrate_body(move || {
        leptos::prelude::view! { <app::App config=config.clone()/> }
    });
}
