//! Admin user management: user table and the status-change dialog.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only reachable with the ADMIN role (router gate). The backend still has
//! the final say: a 403 renders an inline message and leaves the session
//! alone, while a 401 goes through the usual forced logout.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use chrono::NaiveDateTime;
use leptos::prelude::*;

use crate::app::{AppStore, Flash, spawn};
use crate::net::api;
use crate::net::types::{Role, User, UserStatusChange};
use crate::pages::api_error_text;

pub const STATUS_UPDATED: &str = "User status updated.";
pub const SUCCESS_VISIBLE_MS: u64 = 3000;

/// Dialog state for one user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusForm {
    pub role: Role,
    pub enabled: bool,
    pub unlock: bool,
}

impl StatusForm {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self { role: user.role, enabled: user.enabled, unlock: false }
    }

    #[must_use]
    pub fn to_change(&self, user: &User) -> UserStatusChange {
        UserStatusChange::for_user(user, self.role, self.enabled, self.unlock)
    }
}

#[must_use]
pub fn format_timestamp(value: Option<NaiveDateTime>) -> String {
    value.map_or_else(|| "-".to_owned(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

/// `"Locked until ..."` while the lock is active.
#[must_use]
pub fn lock_label(user: &User, now: NaiveDateTime) -> Option<String> {
    if !user.is_locked(now) {
        return None;
    }
    Some(format!("Locked until {}", format_timestamp(user.locked_until())))
}

#[must_use]
pub fn role_class(role: Role) -> &'static str {
    match role {
        Role::Admin => "role-badge role-badge--admin",
        Role::Guest => "role-badge role-badge--guest",
        Role::User => "role-badge",
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let store = expect_context::<AppStore>();
    let flash = expect_context::<Flash>();

    let users = RwSignal::new(Vec::<User>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let success = RwSignal::new(None::<String>);
    let selected = RwSignal::new(None::<User>);
    let form = RwSignal::new(StatusForm { role: Role::User, enabled: true, unlock: false });
    let dialog_error = RwSignal::new(None::<String>);
    let updating = RwSignal::new(false);

    let show_success = move |text: String| {
        success.set(Some(text));
        #[cfg(feature = "hydrate")]
        {
            let shown = success.try_get_untracked().flatten();
            set_timeout(
                move || {
                    let _ = success.try_update(|current| {
                        if *current == shown {
                            *current = None;
                        }
                    });
                },
                std::time::Duration::from_millis(SUCCESS_VISIBLE_MS),
            );
        }
    };

    let fetch_users = {
        let store = store.clone();
        move || {
            let store = store.clone();
            spawn(async move {
                match api::list_users(&store).await {
                    Ok(list) => {
                        users.set(list);
                        error.set(None);
                    }
                    Err(e) => error.set(Some(api_error_text(&e, flash))),
                }
                loading.set(false);
            });
        }
    };
    fetch_users();

    let close_dialog = move || {
        selected.set(None);
        dialog_error.set(None);
    };

    let on_submit = {
        let fetch_users = fetch_users.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if updating.get_untracked() {
                return;
            }
            let Some(user) = selected.get_untracked() else {
                return;
            };
            let change = form.get_untracked().to_change(&user);
            updating.set(true);
            dialog_error.set(None);
            let store = store.clone();
            let fetch_users = fetch_users.clone();
            spawn(async move {
                match api::change_user_status(&store, user.id, &change).await {
                    Ok(()) => {
                        fetch_users();
                        close_dialog();
                        show_success(STATUS_UPDATED.to_owned());
                    }
                    Err(e) => dialog_error.set(Some(api_error_text(&e, flash))),
                }
                updating.set(false);
            });
        }
    };

    view! {
        <div class="admin">
            <h1>"User management"</h1>
            {move || success.get().map(|text| view! { <p class="form-message form-message--success">{text}</p> })}
            {move || error.get().map(|text| view! { <p class="form-message form-message--error">{text}</p> })}

            <Show when=move || !loading.get() fallback=|| view! { <p>"Loading users..."</p> }>
                <table class="admin__table">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Username"</th>
                            <th>"Display name"</th>
                            <th>"Email"</th>
                            <th>"Role"</th>
                            <th>"Status"</th>
                            <th>"Failed logins"</th>
                            <th>"Last login"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let now = now();
                            users
                                .get()
                                .into_iter()
                                .map(|user| {
                                    let lock = lock_label(&user, now);
                                    let status = if user.enabled { "Enabled" } else { "Disabled" };
                                    let for_edit = user.clone();
                                    view! {
                                        <tr>
                                            <td>{user.id}</td>
                                            <td>{user.username.clone()}</td>
                                            <td>{user.display_name.clone()}</td>
                                            <td>{user.email.clone()}</td>
                                            <td><span class=role_class(user.role)>{user.role.as_str()}</span></td>
                                            <td>
                                                {status}
                                                {lock.map(|text| view! { <span class="admin__locked">{text}</span> })}
                                            </td>
                                            <td class="num">{user.login_failed_attempts}</td>
                                            <td>{format_timestamp(user.last_login())}</td>
                                            <td>
                                                <button
                                                    type="button"
                                                    on:click=move |_| {
                                                        form.set(StatusForm::from_user(&for_edit));
                                                        dialog_error.set(None);
                                                        selected.set(Some(for_edit.clone()));
                                                    }
                                                >
                                                    "Edit"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </Show>

            <Show when=move || selected.get().is_some()>
                <div class="dialog-backdrop">
                    <form class="dialog" on:submit=on_submit.clone()>
                        <h2>
                            {move || {
                                selected.get().map(|u| format!("Edit {}", u.username)).unwrap_or_default()
                            }}
                        </h2>
                        <label class="field">
                            <span>"Role"</span>
                            <select
                                prop:value=move || form.get().role.as_str()
                                on:change=move |ev| {
                                    if let Some(role) = Role::parse(&event_target_value(&ev)) {
                                        form.update(|f| f.role = role);
                                    }
                                }
                            >
                                {Role::ALL
                                    .into_iter()
                                    .map(|role| view! { <option value=role.as_str()>{role.as_str()}</option> })
                                    .collect_view()}
                            </select>
                        </label>
                        <label class="field field--checkbox">
                            <input
                                type="checkbox"
                                prop:checked=move || form.get().enabled
                                on:change=move |ev| {
                                    let checked = event_target_checked(&ev);
                                    form.update(|f| f.enabled = checked);
                                }
                            />
                            <span>"Account enabled"</span>
                        </label>
                        <Show when=move || selected.get().is_some_and(|u| u.is_locked(now()))>
                            <p class="admin__locked">
                                {move || selected.get().and_then(|u| lock_label(&u, now())).unwrap_or_default()}
                            </p>
                            <label class="field field--checkbox">
                                <input
                                    type="checkbox"
                                    prop:checked=move || form.get().unlock
                                    on:change=move |ev| {
                                        let checked = event_target_checked(&ev);
                                        form.update(|f| f.unlock = checked);
                                    }
                                />
                                <span>"Unlock account and reset failed logins"</span>
                            </label>
                        </Show>
                        {move || dialog_error.get().map(|text| view! { <p class="form-message form-message--error">{text}</p> })}
                        <div class="dialog__actions">
                            <button class="button" type="button" on:click=move |_| close_dialog()>
                                "Cancel"
                            </button>
                            <button class="button button--primary" type="submit" disabled=move || updating.get()>
                                {move || if updating.get() { "Updating..." } else { "Update" }}
                            </button>
                        </div>
                    </form>
                </div>
            </Show>
        </div>
    }
}
