//! Property search, list with yields and totals, and the detail/edit/delete dialogs.
//!
//! SYSTEM CONTEXT
//! ==============
//! Default authenticated screen. Loads the full list on mount, re-queries
//! `/searchRealestate` with the non-blank filters, and refreshes after every
//! successful edit or delete.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use chrono::NaiveDate;
use leptos::prelude::*;

use crate::app::{AppStore, Flash, spawn};
use crate::finance::{self, Totals};
use crate::net::api;
use crate::net::types::{RealEstate, SearchParams};
use crate::pages::api_error_text;
use crate::pages::property_form::{BUILDING_STRUCTURES, BUILDING_TYPES, PropertyDraft, PropertyFields};
use crate::validation::FieldErrors;

pub const PROPERTY_UPDATED: &str = "The property was updated.";
pub const PROPERTY_DELETED: &str = "The property was deleted.";

/// Display strings for one list row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRow {
    pub project_name: String,
    pub address: String,
    pub building_type: String,
    pub structure: String,
    pub age: String,
    pub acquisition_price: String,
    pub rent: String,
    pub monthly_profit: String,
    pub gross_yield: String,
    pub net_yield: String,
}

impl PropertyRow {
    #[must_use]
    pub fn new(property: &RealEstate, today: NaiveDate) -> Self {
        let ie = property.income_and_expenses.as_ref();
        let building = property.building.as_ref();
        Self {
            project_name: or_dash(property.project_name()),
            address: or_dash(property.parcel.as_ref().map_or("", |p| p.parcel_address.as_str())),
            building_type: or_dash(building.map_or("", |b| b.building_type.as_str())),
            structure: or_dash(building.map_or("", |b| b.building_structure.as_str())),
            age: building
                .and_then(|b| finance::building_age(&b.building_date, today))
                .map_or_else(|| "-".to_owned(), |years| format!("{years} yrs")),
            acquisition_price: finance::format_price(finance::acquisition_price(property)),
            rent: finance::format_price(finance::monthly_rent(ie)),
            monthly_profit: finance::format_price(finance::monthly_profit(ie)),
            gross_yield: finance::format_yield(finance::gross_yield(property)),
            net_yield: finance::format_yield(finance::net_yield(property)),
        }
    }
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() { "-".to_owned() } else { value.to_owned() }
}

/// Detail dialog lines as `(label, value)`.
#[must_use]
pub fn detail_lines(property: &RealEstate, today: NaiveDate) -> Vec<(&'static str, String)> {
    let row = PropertyRow::new(property, today);
    let ie = property.income_and_expenses.as_ref();
    let parcel = property.parcel.clone().unwrap_or_default();
    let building = property.building.clone().unwrap_or_default();
    vec![
        ("Project", row.project_name),
        ("Address", row.address),
        ("Land category", or_dash(&parcel.parcel_category)),
        ("Parcel area", format!("{} m²", parcel.parcel_size)),
        ("Parcel price", finance::format_price(parcel.parcel_price)),
        ("Building type", row.building_type),
        ("Structure", row.structure),
        ("Floor area", format!("{} m²", building.building_size)),
        ("Completion date", or_dash(&building.building_date)),
        ("Age", row.age),
        ("Building price", finance::format_price(building.building_price)),
        ("Acquisition price", row.acquisition_price),
        ("Monthly rent", row.rent),
        ("Monthly expenses", finance::format_price(finance::monthly_expenses(ie))),
        ("Monthly profit", row.monthly_profit),
        ("Gross yield", row.gross_yield),
        ("Net yield", row.net_yield),
        ("Notes", or_dash(ie.map_or("", |ie| ie.other.as_str()))),
    ]
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[component]
pub fn SearchPage() -> impl IntoView {
    let store = expect_context::<AppStore>();
    let flash = expect_context::<Flash>();

    let filters = RwSignal::new(SearchParams::default());
    let list = RwSignal::new(Vec::<RealEstate>::new());
    let loading = RwSignal::new(false);
    let message = RwSignal::new(None::<(bool, String)>);

    let detail = RwSignal::new(None::<RealEstate>);
    let editing = RwSignal::new(false);
    let edit_draft = RwSignal::new(PropertyDraft::default());
    let edit_errors = RwSignal::new(FieldErrors::default());
    let deleting = RwSignal::new(None::<RealEstate>);

    let fetch = {
        let store = store.clone();
        move |params: SearchParams| {
            loading.set(true);
            let store = store.clone();
            spawn(async move {
                match api::search_properties(&store, &params).await {
                    Ok(found) => list.set(found),
                    Err(e) => message.set(Some((false, api_error_text(&e, flash)))),
                }
                loading.set(false);
            });
        }
    };
    fetch(SearchParams::default());

    let on_search = {
        let fetch = fetch.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            message.set(None);
            fetch(filters.get_untracked());
        }
    };
    let on_reset = {
        let fetch = fetch.clone();
        move |_| {
            filters.set(SearchParams::default());
            message.set(None);
            fetch(SearchParams::default());
        }
    };

    let on_save_edit = {
        let store = store.clone();
        let fetch = fetch.clone();
        move |_| {
            let property = match edit_draft.get_untracked().to_real_estate() {
                Ok(property) => property,
                Err(found) => {
                    edit_errors.set(found);
                    return;
                }
            };
            let store = store.clone();
            let fetch = fetch.clone();
            spawn(async move {
                match api::update_property(&store, &property).await {
                    Ok(()) => {
                        editing.set(false);
                        message.set(Some((true, PROPERTY_UPDATED.to_owned())));
                        fetch(filters.get_untracked());
                    }
                    Err(e) => message.set(Some((false, api_error_text(&e, flash)))),
                }
            });
        }
    };

    let on_confirm_delete = {
        let store = store.clone();
        let fetch = fetch.clone();
        move |_| {
            let Some(target) = deleting.get_untracked() else {
                return;
            };
            deleting.set(None);
            let Some(id) = target.delete_id() else {
                message.set(Some((false, "This property has no identifier and cannot be deleted.".to_owned())));
                return;
            };
            let store = store.clone();
            let fetch = fetch.clone();
            spawn(async move {
                match api::delete_property(&store, id).await {
                    Ok(()) => {
                        message.set(Some((true, PROPERTY_DELETED.to_owned())));
                        fetch(filters.get_untracked());
                    }
                    Err(e) => message.set(Some((false, api_error_text(&e, flash)))),
                }
            });
        }
    };

    let filter_input = move |label: &'static str,
                             get: fn(&SearchParams) -> String,
                             set: fn(&mut SearchParams, String)| {
        view! {
            <label class="field">
                <span>{label}</span>
                <input
                    type="text"
                    prop:value=move || get(&filters.get())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        filters.update(|f| set(f, value));
                    }
                />
            </label>
        }
    };
    let filter_select = move |label: &'static str,
                              options: &'static [(&'static str, &'static str)],
                              get: fn(&SearchParams) -> String,
                              set: fn(&mut SearchParams, String)| {
        view! {
            <label class="field">
                <span>{label}</span>
                <select
                    prop:value=move || get(&filters.get())
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        filters.update(|f| set(f, value));
                    }
                >
                    <option value="">"Any"</option>
                    {options.iter().map(|(wire, text)| view! { <option value=*wire>{*text}</option> }).collect_view()}
                </select>
            </label>
        }
    };

    let totals = Memo::new(move |_| Totals::of(&list.get()));

    view! {
        <div class="search">
            <h1>"Properties"</h1>
            <form class="search__filters" on:submit=on_search>
                {filter_input("Project name", |f| f.project_name.clone(), |f, v| f.project_name = v)}
                {filter_input("Address", |f| f.parcel_address.clone(), |f, v| f.parcel_address = v)}
                {filter_select("Building type", &BUILDING_TYPES, |f| f.building_type.clone(), |f, v| f.building_type = v)}
                {filter_select(
                    "Structure",
                    &BUILDING_STRUCTURES,
                    |f| f.building_structure.clone(),
                    |f, v| f.building_structure = v,
                )}
                <div class="search__filter-actions">
                    <button class="button button--primary" type="submit">"Search"</button>
                    <button class="button" type="button" on:click=on_reset>"Reset"</button>
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

            <Show
                when=move || !loading.get()
                fallback=|| view! { <p class="search__loading">"Loading properties..."</p> }
            >
                <Show
                    when=move || !list.get().is_empty()
                    fallback=|| view! { <p class="search__empty">"No properties found."</p> }
                >
                    <table class="search__table">
                        <thead>
                            <tr>
                                <th>"Project"</th>
                                <th>"Address"</th>
                                <th>"Type"</th>
                                <th>"Structure"</th>
                                <th>"Age"</th>
                                <th>"Acquisition"</th>
                                <th>"Rent / mo"</th>
                                <th>"Profit / mo"</th>
                                <th>"Gross"</th>
                                <th>"Net"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || {
                                let today = today();
                                list.get()
                                    .into_iter()
                                    .map(|property| {
                                        let row = PropertyRow::new(&property, today);
                                        let for_detail = property.clone();
                                        let for_edit = property.clone();
                                        view! {
                                            <tr>
                                                <td>{row.project_name}</td>
                                                <td>{row.address}</td>
                                                <td>{row.building_type}</td>
                                                <td>{row.structure}</td>
                                                <td>{row.age}</td>
                                                <td class="num">{row.acquisition_price}</td>
                                                <td class="num">{row.rent}</td>
                                                <td class="num">{row.monthly_profit}</td>
                                                <td class="num">{row.gross_yield}</td>
                                                <td class="num">{row.net_yield}</td>
                                                <td class="search__row-actions">
                                                    <button type="button" on:click=move |_| detail.set(Some(for_detail.clone()))>
                                                        "Details"
                                                    </button>
                                                    <button
                                                        type="button"
                                                        on:click=move |_| {
                                                            edit_draft.set(PropertyDraft::from_real_estate(&for_edit));
                                                            edit_errors.set(FieldErrors::default());
                                                            editing.set(true);
                                                        }
                                                    >
                                                        "Edit"
                                                    </button>
                                                    <button
                                                        type="button"
                                                        class="button--danger"
                                                        on:click=move |_| deleting.set(Some(property.clone()))
                                                    >
                                                        "Delete"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tbody>
                        <tfoot>
                            <tr class="search__totals">
                                <td colspan="5">{move || format!("Total ({} properties)", totals.get().count)}</td>
                                <td class="num">{move || finance::format_price(totals.get().acquisition_price)}</td>
                                <td class="num">{move || finance::format_price(totals.get().rent)}</td>
                                <td class="num">{move || finance::format_price(totals.get().monthly_profit)}</td>
                                <td class="num">{move || finance::format_yield(totals.get().gross_yield())}</td>
                                <td class="num">{move || finance::format_yield(totals.get().net_yield())}</td>
                                <td class="num">
                                    {move || {
                                        format!("avg {}", finance::format_price(totals.get().average_acquisition_price()))
                                    }}
                                </td>
                            </tr>
                        </tfoot>
                    </table>
                </Show>
            </Show>

            {move || {
                detail
                    .get()
                    .map(|property| {
                        view! {
                            <div class="dialog-backdrop" on:click=move |_| detail.set(None)>
                                <div class="dialog" on:click=|ev| ev.stop_propagation()>
                                    <h2>"Property details"</h2>
                                    <dl class="dialog__details">
                                        {detail_lines(&property, today())
                                            .into_iter()
                                            .map(|(label, value)| view! { <dt>{label}</dt><dd>{value}</dd> })
                                            .collect_view()}
                                    </dl>
                                    <button class="button" type="button" on:click=move |_| detail.set(None)>
                                        "Close"
                                    </button>
                                </div>
                            </div>
                        }
                    })
            }}

            <Show when=move || editing.get()>
                <div class="dialog-backdrop">
                    <div class="dialog dialog--wide">
                        <h2>"Edit property"</h2>
                        <PropertyFields draft=edit_draft errors=edit_errors/>
                        <div class="dialog__actions">
                            <button class="button" type="button" on:click=move |_| editing.set(false)>
                                "Cancel"
                            </button>
                            <button class="button button--primary" type="button" on:click=on_save_edit.clone()>
                                "Save"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>

            <Show when=move || deleting.get().is_some()>
                <div class="dialog-backdrop">
                    <div class="dialog">
                        <h2>"Delete property"</h2>
                        <p>
                            {move || {
                                let name = deleting.get().map(|p| p.project_name().to_owned()).unwrap_or_default();
                                format!("Delete \"{name}\"? This cannot be undone.")
                            }}
                        </p>
                        <div class="dialog__actions">
                            <button class="button" type="button" on:click=move |_| deleting.set(None)>
                                "Cancel"
                            </button>
                            <button
                                class="button button--danger"
                                type="button"
                                on:click=on_confirm_delete.clone()
                            >
                                "Delete"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
