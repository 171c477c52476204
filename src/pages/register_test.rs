use super::*;

fn filled() -> RegisterForm {
    RegisterForm {
        username: " hanako ".to_owned(),
        password: "secret1".to_owned(),
        confirm_password: "secret1".to_owned(),
        email: "hanako@example.com ".to_owned(),
        display_name: "Hanako".to_owned(),
    }
}

#[test]
fn valid_form_has_no_errors_and_trims_request() {
    let form = filled();
    assert!(form.field_errors().is_empty());
    let request = form.to_request();
    assert_eq!(request.username, "hanako");
    assert_eq!(request.email, "hanako@example.com");
}

#[test]
fn empty_form_flags_every_field() {
    let errors = RegisterForm::default().field_errors();
    for field in ["username", "password", "confirmPassword", "email", "displayName"] {
        assert!(errors.get(field).is_some(), "{field}");
    }
}

#[test]
fn mismatched_confirmation_is_flagged() {
    let form = RegisterForm { confirm_password: "secret2".to_owned(), ..filled() };
    let errors = form.field_errors();
    assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match."));
    assert_eq!(errors.get("password"), None);
}

#[test]
fn short_username_and_bad_email_are_flagged() {
    let form = RegisterForm { username: "ab".to_owned(), email: "a@b".to_owned(), ..filled() };
    let errors = form.field_errors();
    assert_eq!(errors.get("username"), Some("Username must be at least 3 characters."));
    assert_eq!(errors.get("email"), Some("Enter a valid email address."));
}
