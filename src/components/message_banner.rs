//! Dismissible success/error banner.

#[cfg(test)]
#[path = "message_banner_test.rs"]
mod message_banner_test;

use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

impl Banner {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Self::Success(_) => "banner banner--success",
            Self::Error(_) => "banner banner--error",
        }
    }
}

/// Renders `banner` when set; the close button clears it.
#[component]
pub fn MessageBanner(banner: RwSignal<Option<Banner>>) -> impl IntoView {
    move || {
        banner.get().map(|current| {
            view! {
                <div class=current.class() role="alert">
                    <span class="banner__text">{current.text().to_owned()}</span>
                    <button class="banner__close" type="button" on:click=move |_| banner.set(None)>
                        "×"
                    </button>
                </div>
            }
        })
    }
}
