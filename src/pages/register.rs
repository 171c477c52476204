//! Account registration page.
//!
//! Success does not sign the user in: the page routes to Login with a banner.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;

use crate::app::{AppStore, Flash, spawn, use_navigate};
use crate::net::types::RegistrationRequest;
use crate::state::router::View;
use crate::state::session::Session;
use crate::validation::{self, FieldErrors};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub display_name: String,
}

impl RegisterForm {
    #[must_use]
    pub fn to_request(&self) -> RegistrationRequest {
        RegistrationRequest {
            username: self.username.trim().to_owned(),
            password: self.password.clone(),
            email: self.email.trim().to_owned(),
            display_name: self.display_name.trim().to_owned(),
        }
    }

    #[must_use]
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = self.to_request().field_errors();
        errors.check(
            "confirmPassword",
            validation::password_confirmation(&self.password, &self.confirm_password),
        );
        errors
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let store = expect_context::<AppStore>();
    let session = expect_context::<RwSignal<Session>>();
    let flash = expect_context::<Flash>();
    let navigate = use_navigate();

    let form = RwSignal::new(RegisterForm::default());
    let errors = RwSignal::new(FieldErrors::default());
    let error = RwSignal::new(None::<String>);
    let busy = move || session.get().is_loading();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let current = form.get_untracked();
        let found = current.field_errors();
        let valid = found.is_empty();
        errors.set(found);
        error.set(None);
        if !valid {
            return;
        }
        let store = store.clone();
        spawn(async move {
            match store.register(&current.to_request()).await {
                Ok(message) => {
                    flash.success(message);
                    navigate(View::Login);
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    };

    let field = move |name: &'static str,
                      label: &'static str,
                      kind: &'static str,
                      get: fn(&RegisterForm) -> String,
                      set: fn(&mut RegisterForm, String)| {
        view! {
            <label class="field">
                <span>{label}</span>
                <input
                    type=kind
                    prop:value=move || get(&form.get())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| set(f, value));
                        errors.update(|e| e.clear(name));
                    }
                />
                <Show when=move || errors.get().get(name).is_some()>
                    <span class="field__error">{move || errors.get().get(name).unwrap_or_default()}</span>
                </Show>
            </label>
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create account"</h1>
                <form class="auth-form" on:submit=on_submit>
                    {field("username", "Username", "text", |f| f.username.clone(), |f, v| f.username = v)}
                    {field("displayName", "Display name", "text", |f| f.display_name.clone(), |f, v| f.display_name = v)}
                    {field("email", "Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                    {field("password", "Password", "password", |f| f.password.clone(), |f, v| f.password = v)}
                    {field(
                        "confirmPassword",
                        "Confirm password",
                        "password",
                        |f| f.confirm_password.clone(),
                        |f, v| f.confirm_password = v,
                    )}
                    <button class="button button--primary" type="submit" disabled=busy>
                        {move || if busy() { "Registering..." } else { "Register" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="auth-card__error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <p class="auth-card__links">
                    <button type="button" class="link" on:click=move |_| navigate(View::Login)>
                        "Back to log in"
                    </button>
                    <button type="button" class="link" on:click=move |_| navigate(View::Landing)>
                        "Back to the top page"
                    </button>
                </p>
            </div>
        </div>
    }
}
