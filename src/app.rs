//! Root application component, context providers and view switching.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the one `SessionStore` for the page and provides it through
//! context together with two signals: a mirror of the current `Session` (kept
//! in step by a store listener) and the `ViewRouter`. Pages read both and
//! never hold session state of their own.
//!
//! DESIGN
//! ======
//! There is no URL router. An effect re-runs the router gate whenever the
//! session changes, and under `hydrate` the active view is mirrored into the
//! location hash so reloads and the back button keep working.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::future::Future;

use leptos::prelude::*;
use leptos::tachys::view::any_view::{AnyView, IntoAny};
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};

use crate::components::header::Header;
use crate::components::loading_overlay::LoadingOverlay;
use crate::components::message_banner::{Banner, MessageBanner};
use crate::config::ClientConfig;
use crate::net::http::BrowserTransport;
use crate::pages::{
    admin::AdminPage, landing::LandingPage, login::LoginPage, profile::ProfilePage,
    property_form::RegisterPropertyPage, register::RegisterPage, search::SearchPage,
};
use crate::state::router::{Screen, View, ViewRouter};
use crate::state::session::Session;
use crate::state::storage::BrowserStorage;
use crate::state::store::SessionStore;

/// Store type used by the browser app.
pub type AppStore = SessionStore<BrowserTransport, BrowserStorage>;

/// Page-level notice that survives a view change (e.g. "registered, now log in").
#[derive(Clone, Copy)]
pub struct Flash(pub RwSignal<Option<Banner>>);

impl Flash {
    pub fn success(self, message: impl Into<String>) {
        self.0.set(Some(Banner::Success(message.into())));
    }

    pub fn error(self, message: impl Into<String>) {
        self.0.set(Some(Banner::Error(message.into())));
    }

    pub fn clear(self) {
        self.0.set(None);
    }
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    let config = ClientConfig::from_build_env().unwrap_or_default();
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App config/>
            </body>
        </html>
    }
}

/// Run `task` on the browser's local executor. Server renders never run
/// event handlers, so outside `hydrate` the task is dropped.
pub fn spawn<F>(task: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(task);
    #[cfg(not(feature = "hydrate"))]
    let _ = task;
}

/// Move to `view`, subject to the router gate.
pub fn use_navigate() -> impl Fn(View) + Clone + Copy + 'static {
    let router = expect_context::<RwSignal<ViewRouter>>();
    let session = expect_context::<RwSignal<Session>>();
    move |view: View| {
        let current = session.get_untracked();
        router.update(|r| {
            r.navigate(view, &current);
        });
    }
}

/// Root application component.
#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    provide_meta_context();

    let store: AppStore =
        SessionStore::new(BrowserTransport, BrowserStorage::new(config.token_storage_key.clone()), config);
    let session = RwSignal::new(store.current_session());
    store.subscribe(move |snapshot| session.set(snapshot.clone()));

    let router = RwSignal::new(ViewRouter::new(initial_view()));
    let flash = Flash(RwSignal::new(None));

    provide_context(store.clone());
    provide_context(session);
    provide_context(router);
    provide_context(flash);

    {
        let store = store.clone();
        spawn(async move { store.validate_on_load().await });
    }

    // Re-apply the gate whenever the session or the active view changes.
    // A settled router makes `regate` return `None`, which ends the loop.
    Effect::new(move || {
        if let Some(next) = regate(router.get(), &session.get()) {
            router.set(next);
        }
    });

    #[cfg(feature = "hydrate")]
    {
        Effect::new(move || {
            let hash = router.get().active().hash();
            if let Some(window) = web_sys::window() {
                let location = window.location();
                if location.hash().ok().as_deref() != Some(hash.as_str()) {
                    let _ = location.set_hash(&hash);
                }
            }
        });
        let navigate = use_navigate();
        let handle = window_event_listener(leptos::ev::hashchange, move |_| {
            if let Some(view) = initial_view_from_location() {
                if router.get_untracked().active() != view {
                    navigate(view);
                }
            }
        });
        on_cleanup(move || handle.remove());
    }

    // Pages stay mounted while a sign-in call toggles `loading`; the overlay
    // covers them instead. Nothing renders until the first validation settles.
    let screen = Memo::new(move |_| router.get().screen(&session.get()));
    let active = Memo::new(move |_| router.get().active());
    let settled = Memo::new(move |prev: Option<&bool>| prev.copied().unwrap_or(false) || !session.get().is_loading());

    view! {
        <Stylesheet id="leptos" href="/pkg/estate-client.css"/>
        <Title text="Estate Manager"/>

        <div class="app">
            <Show when=move || session.get().is_authenticated()>
                <Header/>
            </Show>
            <MessageBanner banner=flash.0/>
            <main class="app__main">
                <Show when=move || settled.get()>
                    {move || render_view(active.get())}
                </Show>
                <Show when=move || screen.get() == Screen::Loading>
                    <LoadingOverlay/>
                </Show>
            </main>
        </div>
    }
}

/// The router after the gate ran, or `None` when the view is allowed as is.
fn regate(mut router: ViewRouter, session: &Session) -> Option<ViewRouter> {
    router.sync(session).map(|_| router)
}

fn render_view(view: View) -> AnyView {
    match view {
        View::Landing => view! { <LandingPage/> }.into_any(),
        View::Login => view! { <LoginPage/> }.into_any(),
        View::Register => view! { <RegisterPage/> }.into_any(),
        View::Search => view! { <SearchPage/> }.into_any(),
        View::RegisterProperty => view! { <RegisterPropertyPage/> }.into_any(),
        View::Profile => view! { <ProfilePage/> }.into_any(),
        View::Admin => view! { <AdminPage/> }.into_any(),
    }
}

fn initial_view() -> View {
    #[cfg(feature = "hydrate")]
    {
        initial_view_from_location().unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        View::default()
    }
}

#[cfg(feature = "hydrate")]
fn initial_view_from_location() -> Option<View> {
    let hash = web_sys::window()?.location().hash().ok()?;
    View::from_hash(&hash)
}
