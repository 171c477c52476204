//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Shared chrome rendered by `App` around every page. Components read the
//! session and router signals from Leptos context.

pub mod header;
pub mod loading_overlay;
pub mod message_banner;
