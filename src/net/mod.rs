//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` defines the request/response model and transports, `api` holds the
//! typed endpoint calls, and `types` defines the shared wire schema.

pub mod api;
pub mod http;
pub mod types;
