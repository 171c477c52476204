use super::*;
use crate::error::TransportError;

#[test]
fn superseded_login_shows_nothing() {
    assert_eq!(login_error_text(&AuthError::Superseded), None);
}

#[test]
fn rejected_login_shows_backend_message() {
    let err = AuthError::Rejected("Invalid username or password".to_owned());
    assert_eq!(login_error_text(&err).as_deref(), Some("Invalid username or password"));
}

#[test]
fn network_failure_is_explained() {
    let err = AuthError::Network(TransportError::Timeout(15_000));
    let text = login_error_text(&err).unwrap();
    assert!(text.starts_with("Could not reach the server"));
}
