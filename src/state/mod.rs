//! Client-side state: the authentication session and the view router.
//!
//! SYSTEM CONTEXT
//! ==============
//! `store` owns the session and is the only code that writes the persisted
//! token (through `storage`). `session` is the plain snapshot the UI reads,
//! and `router` derives the visible screen from it.

pub mod router;
pub mod session;
pub mod storage;
pub mod store;

#[cfg(test)]
pub mod test_support;
