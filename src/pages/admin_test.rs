use super::*;
use crate::state::test_support::make_user;

fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn locked_user() -> User {
    User {
        login_failed_attempts: 5,
        account_locked_until: Some("2024-05-01T12:30:00".to_owned()),
        ..make_user(Role::User)
    }
}

// =============================================================================
// StatusForm
// =============================================================================

#[test]
fn form_starts_from_user_without_unlock() {
    let user = User { enabled: false, ..make_user(Role::Admin) };
    let form = StatusForm::from_user(&user);
    assert_eq!(form, StatusForm { role: Role::Admin, enabled: false, unlock: false });
}

#[test]
fn unlocking_resets_failures_and_lock() {
    let user = locked_user();
    let form = StatusForm { unlock: true, ..StatusForm::from_user(&user) };
    let change = form.to_change(&user);
    assert_eq!(change.login_failed_attempts, 0);
    assert_eq!(change.account_locked_until, None);
}

#[test]
fn keeping_lock_echoes_current_state() {
    let user = locked_user();
    let form = StatusForm { role: Role::Guest, ..StatusForm::from_user(&user) };
    let change = form.to_change(&user);
    assert_eq!(change.role, Role::Guest);
    assert_eq!(change.login_failed_attempts, 5);
    assert_eq!(change.account_locked_until.as_deref(), Some("2024-05-01T12:30:00"));
}

// =============================================================================
// Labels
// =============================================================================

#[test]
fn lock_label_only_while_lock_is_active() {
    let user = locked_user();
    assert_eq!(
        lock_label(&user, at("2024-05-01 12:00:00")).as_deref(),
        Some("Locked until 2024-05-01 12:30")
    );
    assert_eq!(lock_label(&user, at("2024-05-01 13:00:00")), None);
    assert_eq!(lock_label(&make_user(Role::User), at("2024-05-01 12:00:00")), None);
}

#[test]
fn timestamps_format_or_dash() {
    let user = User { last_login_at: Some("2024-03-02 08:05:09".to_owned()), ..make_user(Role::User) };
    assert_eq!(format_timestamp(user.last_login()), "2024-03-02 08:05");
    assert_eq!(format_timestamp(None), "-");
}

#[test]
fn role_badges_differ_per_role() {
    assert_eq!(role_class(Role::User), "role-badge");
    assert!(role_class(Role::Admin).ends_with("--admin"));
    assert!(role_class(Role::Guest).ends_with("--guest"));
}
