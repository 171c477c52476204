//! Profile editor: identity fields, optional password change, account deletion.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;

use crate::app::{AppStore, Flash, spawn};
use crate::net::api;
use crate::net::types::{ProfileUpdate, User};
use crate::pages::api_error_text;
use crate::state::session::Session;
use crate::validation::{self, FieldErrors};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            ..Self::default()
        }
    }

    /// True when any of the three password fields has input.
    #[must_use]
    pub fn changes_password(&self) -> bool {
        !(self.current_password.is_empty() && self.new_password.is_empty() && self.confirm_password.is_empty())
    }

    #[must_use]
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.check("username", validation::profile_username(&self.username));
        errors.check("email", validation::email(&self.email));
        errors.check("displayName", validation::display_name(&self.display_name));
        if self.changes_password() {
            errors.check("currentPassword", validation::current_password(&self.current_password));
            errors.check("newPassword", validation::password(&self.new_password));
            errors.check(
                "confirmPassword",
                validation::password_confirmation(&self.new_password, &self.confirm_password),
            );
        }
        errors
    }

    #[must_use]
    pub fn to_update(&self) -> ProfileUpdate {
        let (current_password, new_password) = if self.new_password.is_empty() {
            (None, None)
        } else {
            (Some(self.current_password.clone()), Some(self.new_password.clone()))
        };
        ProfileUpdate {
            username: self.username.trim().to_owned(),
            email: self.email.trim().to_owned(),
            display_name: self.display_name.trim().to_owned(),
            current_password,
            new_password,
        }
    }

    /// Same identity fields, password inputs emptied.
    #[must_use]
    pub fn without_passwords(&self) -> Self {
        Self {
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            ..Self::default()
        }
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let store = expect_context::<AppStore>();
    let session = expect_context::<RwSignal<Session>>();
    let flash = expect_context::<Flash>();

    let initial = session.get_untracked().user().map(ProfileForm::from_user).unwrap_or_default();
    let form = RwSignal::new(initial);
    let errors = RwSignal::new(FieldErrors::default());
    let message = RwSignal::new(None::<(bool, String)>);
    let saving = RwSignal::new(false);
    let confirm_delete = RwSignal::new(false);

    let on_submit = {
        let store = store.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if saving.get_untracked() {
                return;
            }
            let current = form.get_untracked();
            let found = current.field_errors();
            let valid = found.is_empty();
            errors.set(found);
            message.set(None);
            if !valid {
                return;
            }
            saving.set(true);
            let store = store.clone();
            spawn(async move {
                match api::update_user_info(&store, &current.to_update()).await {
                    Ok(text) => {
                        form.set(current.without_passwords());
                        message.set(Some((true, text)));
                    }
                    Err(e) => message.set(Some((false, api_error_text(&e, flash)))),
                }
                saving.set(false);
            });
        }
    };

    let on_reset = move |_| {
        let reset = session.get_untracked().user().map(ProfileForm::from_user).unwrap_or_default();
        form.set(reset);
        errors.set(FieldErrors::default());
        message.set(None);
    };

    let on_delete = move |_| {
        confirm_delete.set(false);
        let store = store.clone();
        spawn(async move {
            match api::delete_account(&store).await {
                Ok(()) => flash.success("Your account was deleted."),
                Err(e) => message.set(Some((false, api_error_text(&e, flash)))),
            }
        });
    };

    let field = move |name: &'static str,
                      label: &'static str,
                      kind: &'static str,
                      get: fn(&ProfileForm) -> String,
                      set: fn(&mut ProfileForm, String)| {
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
                        message.set(None);
                    }
                />
                <Show when=move || errors.get().get(name).is_some()>
                    <span class="field__error">{move || errors.get().get(name).unwrap_or_default()}</span>
                </Show>
            </label>
        }
    };

    view! {
        <div class="profile">
            <h1>"Profile"</h1>
            <form class="profile__form" on:submit=on_submit>
                <fieldset>
                    <legend>"Account"</legend>
                    {field("username", "Username", "text", |f| f.username.clone(), |f, v| f.username = v)}
                    {field("email", "Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                    {field("displayName", "Display name", "text", |f| f.display_name.clone(), |f, v| f.display_name = v)}
                </fieldset>
                <fieldset>
                    <legend>"Change password (optional)"</legend>
                    {field(
                        "currentPassword",
                        "Current password",
                        "password",
                        |f| f.current_password.clone(),
                        |f, v| f.current_password = v,
                    )}
                    {field("newPassword", "New password", "password", |f| f.new_password.clone(), |f, v| f.new_password = v)}
                    {field(
                        "confirmPassword",
                        "Confirm new password",
                        "password",
                        |f| f.confirm_password.clone(),
                        |f, v| f.confirm_password = v,
                    )}
                </fieldset>
                <div class="profile__actions">
                    <button class="button" type="button" on:click=on_reset>"Reset"</button>
                    <button class="button button--primary" type="submit" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>

            {move || {
                message
                    .get()
                    .map(|(ok, text)| {
                        let class = if ok { "form-message form-message--success" } else { "form-message form-message--error" };
                        view! { <p class=class>{text}</p> }
                    })
            }}

            <section class="profile__danger">
                <h2>"Delete account"</h2>
                <p>"Your account and sign-in will be removed permanently."</p>
                <button class="button button--danger" type="button" on:click=move |_| confirm_delete.set(true)>
                    "Delete account"
                </button>
            </section>

            <Show when=move || confirm_delete.get()>
                <div class="dialog-backdrop">
                    <div class="dialog">
                        <h2>"Delete your account?"</h2>
                        <p>"This cannot be undone."</p>
                        <div class="dialog__actions">
                            <button class="button" type="button" on:click=move |_| confirm_delete.set(false)>
                                "Cancel"
                            </button>
                            <button class="button button--danger" type="button" on:click=on_delete.clone()>
                                "Delete"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
