use super::*;
use crate::net::types::Role;
use crate::state::test_support::make_user;

#[test]
fn admin_entry_only_for_admins() {
    for role in Role::ALL {
        let session = Session::authenticated("t1", make_user(role));
        assert_eq!(nav_items(&session).contains(&View::Admin), role == Role::Admin);
    }
}

#[test]
fn nav_items_never_include_public_views() {
    let session = Session::authenticated("t1", make_user(Role::Admin));
    assert!(nav_items(&session).iter().all(|v| v.requires_auth()));
}

#[test]
fn user_label_prefers_display_name() {
    let mut user = make_user(Role::User);
    assert_eq!(user_label(&Session::authenticated("t1", user.clone())), "Taro");
    user.display_name = "  ".to_owned();
    assert_eq!(user_label(&Session::authenticated("t1", user)), "taro");
    assert_eq!(user_label(&Session::default()), "");
}

#[test]
fn nav_class_marks_active() {
    assert!(nav_class(true).ends_with("--active"));
    assert_eq!(nav_class(false), "header__nav-item");
}
