//! Top navigation bar with the user menu.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered by `App` only while signed in. The admin entry is offered to
//! ADMIN users only; the router gate still rejects it for everyone else.

#[cfg(test)]
#[path = "header_test.rs"]
mod header_test;

use leptos::prelude::*;

use crate::app::{AppStore, Flash, spawn, use_navigate};
use crate::state::router::{View, ViewRouter};
use crate::state::session::Session;

/// Navigation entries visible to `session`, in display order.
pub fn nav_items(session: &Session) -> Vec<View> {
    let mut items = vec![View::Search, View::RegisterProperty, View::Profile];
    if session.is_admin() {
        items.push(View::Admin);
    }
    items
}

/// Display name, falling back to the username.
pub fn user_label(session: &Session) -> String {
    session
        .user()
        .map(|user| {
            if user.display_name.trim().is_empty() { user.username.clone() } else { user.display_name.clone() }
        })
        .unwrap_or_default()
}

fn nav_class(active: bool) -> &'static str {
    if active { "header__nav-item header__nav-item--active" } else { "header__nav-item" }
}

#[component]
pub fn Header() -> impl IntoView {
    let store = expect_context::<AppStore>();
    let session = expect_context::<RwSignal<Session>>();
    let router = expect_context::<RwSignal<ViewRouter>>();
    let flash = expect_context::<Flash>();
    let navigate = use_navigate();
    let menu_open = RwSignal::new(false);

    let on_logout = move |_| {
        menu_open.set(false);
        flash.clear();
        let store = store.clone();
        spawn(async move { store.logout().await });
    };

    view! {
        <nav class="header">
            <h1 class="header__title">"Real Estate Investment Manager"</h1>
            <div class="header__nav">
                <For
                    each=move || nav_items(&session.get())
                    key=|view| *view
                    children=move |view| {
                        view! {
                            <button
                                type="button"
                                class=move || nav_class(router.get().active() == view)
                                on:click=move |_| navigate(view)
                            >
                                {view.title()}
                            </button>
                        }
                    }
                />
            </div>
            <div class="header__user">
                <button type="button" class="header__user-button" on:click=move |_| menu_open.update(|o| *o = !*o)>
                    {move || user_label(&session.get())}
                </button>
                <Show when=move || menu_open.get()>
                    <div class="header__menu">
                        <div class="header__menu-identity">
                            <div>{move || user_label(&session.get())}</div>
                            <div class="header__menu-email">
                                {move || session.get().user().map(|u| u.email.clone()).unwrap_or_default()}
                            </div>
                        </div>
                        <button type="button" class="header__menu-item" on:click=on_logout.clone()>
                            "Log out"
                        </button>
                    </div>
                </Show>
            </div>
        </nav>
    }
}
