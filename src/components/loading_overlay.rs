//! Full-screen spinner shown while the session is loading.

use leptos::prelude::*;

#[component]
pub fn LoadingOverlay() -> impl IntoView {
    view! {
        <div class="loading-overlay" role="status" aria-live="polite">
            <div class="loading-overlay__spinner"></div>
            <p class="loading-overlay__label">"Loading..."</p>
        </div>
    }
}
