//! Login page: username/password form and the one-click guest account.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::app::{AppStore, Flash, spawn, use_navigate};
use crate::error::AuthError;
use crate::net::types::Credentials;
use crate::state::router::View;
use crate::state::session::Session;

/// Message to show for a failed sign-in. A call superseded by logout shows nothing.
pub fn login_error_text(err: &AuthError) -> Option<String> {
    match err {
        AuthError::Superseded => None,
        other => Some(other.to_string()),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = expect_context::<AppStore>();
    let session = expect_context::<RwSignal<Session>>();
    let flash = expect_context::<Flash>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = move || session.get().is_loading();

    let sign_in = move |credentials: Credentials| {
        error.set(None);
        let store = store.clone();
        spawn(async move {
            match store.login(&credentials).await {
                Ok(_) => flash.clear(),
                Err(e) => {
                    log::debug!("login failed: {e}");
                    error.set(login_error_text(&e));
                }
            }
        });
    };

    let submit = sign_in.clone();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        submit(Credentials::new(username.get_untracked(), password.get_untracked()));
    };
    let on_guest = move |_| sign_in(Credentials::guest());

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Log in"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <label class="field">
                        <span>"Username"</span>
                        <input
                            type="text"
                            autocomplete="username"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"Password"</span>
                        <input
                            type="password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>
                    <button class="button button--primary" type="submit" disabled=busy>
                        {move || if busy() { "Logging in..." } else { "Log in" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="auth-card__error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <div class="auth-card__divider"></div>
                <button class="button" type="button" disabled=busy on:click=on_guest>
                    "Try it as a guest"
                </button>
                <p class="auth-card__links">
                    <button type="button" class="link" on:click=move |_| navigate(View::Register)>
                        "Create an account"
                    </button>
                    <button type="button" class="link" on:click=move |_| navigate(View::Landing)>
                        "Back to the top page"
                    </button>
                </p>
            </div>
        </div>
    }
}
