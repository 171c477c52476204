//! Public landing page with entry points to log in or register.

use leptos::prelude::*;

use crate::app::use_navigate;
use crate::state::router::View;

pub const FEATURES: [(&str, &str); 4] = [
    ("Property management", "Parcel and building details in one place."),
    ("Yield calculation", "Gross and net yields computed for every property."),
    ("Cash flow", "Monthly income and every expense line accounted for."),
    ("Search", "Filter the portfolio by project, address, type or structure."),
];

#[component]
pub fn LandingPage() -> impl IntoView {
    let navigate = use_navigate();
    let highlighted = RwSignal::new(0_usize);

    #[cfg(feature = "hydrate")]
    {
        if let Ok(handle) = set_interval_with_handle(
            move || highlighted.update(|i| *i = (*i + 1) % FEATURES.len()),
            std::time::Duration::from_secs(3),
        ) {
            on_cleanup(move || handle.clear());
        }
    }

    view! {
        <div class="landing">
            <header class="landing__hero">
                <h1>"Simple Invest"</h1>
                <p>"Track parcels, buildings and cash flow for your real-estate portfolio."</p>
                <div class="landing__actions">
                    <button class="button button--primary" type="button" on:click=move |_| navigate(View::Login)>
                        "Log in"
                    </button>
                    <button class="button" type="button" on:click=move |_| navigate(View::Register)>
                        "Create account"
                    </button>
                </div>
            </header>
            <ul class="landing__features">
                {FEATURES
                    .iter()
                    .enumerate()
                    .map(|(i, (title, description))| {
                        view! {
                            <li class=move || {
                                if highlighted.get() == i { "landing__feature landing__feature--active" } else { "landing__feature" }
                            }>
                                <h3>{*title}</h3>
                                <p>{*description}</p>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </div>
    }
}
