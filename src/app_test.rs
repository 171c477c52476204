use super::*;
use crate::net::types::Role;
use crate::state::test_support::make_user;

fn signed_in(role: Role) -> Session {
    Session::authenticated("t1", make_user(role))
}

// =============================================================
// regate
// =============================================================

#[test]
fn regate_redirects_view_written_without_navigate() {
    let router = ViewRouter::new(View::Admin);
    let next = regate(router, &signed_in(Role::User)).unwrap();
    assert_eq!(next.active(), View::Search);
}

#[test]
fn regate_settles_after_one_pass() {
    let next = regate(ViewRouter::new(View::Login), &signed_in(Role::Guest)).unwrap();
    assert_eq!(regate(next, &signed_in(Role::Guest)), None);
}

#[test]
fn regate_leaves_allowed_view_alone() {
    assert_eq!(regate(ViewRouter::new(View::Admin), &signed_in(Role::Admin)), None);
    assert_eq!(regate(ViewRouter::new(View::Landing), &Session::default()), None);
}

#[test]
fn regate_waits_while_loading() {
    assert_eq!(regate(ViewRouter::new(View::Admin), &Session::starting()), None);
}
