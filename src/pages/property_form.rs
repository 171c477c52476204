//! Property registration form, shared with the search page's edit dialog.
//!
//! DESIGN
//! ======
//! The form edits a flat [`PropertyDraft`] of strings keyed by
//! [`PropertyField`]. Conversion to the nested wire record happens once, on
//! submit, where amounts and areas are parsed and checked.

#[cfg(test)]
#[path = "property_form_test.rs"]
mod property_form_test;

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;

use crate::app::{AppStore, Flash, spawn};
use crate::net::api;
use crate::net::types::{Building, IncomeAndExpenses, Parcel, Project, RealEstate};
use crate::pages::api_error_text;
use crate::validation::FieldErrors;

pub const PROPERTY_REGISTERED: &str = "The property was registered.";

pub const BUILDING_TYPES: [(&str, &str); 6] = [
    ("マンション", "Condominium"),
    ("アパート", "Apartment"),
    ("戸建て", "Detached house"),
    ("店舗", "Shop"),
    ("事務所", "Office"),
    ("その他", "Other"),
];

pub const BUILDING_STRUCTURES: [(&str, &str); 5] = [
    ("鉄筋コンクリート造", "Reinforced concrete"),
    ("鉄骨造", "Steel frame"),
    ("木造", "Wood"),
    ("軽量鉄骨造", "Light steel frame"),
    ("その他", "Other"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Amount,
    Area,
    Date,
    BuildingType,
    BuildingStructure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyField {
    ProjectName,
    ParcelPrice,
    ParcelAddress,
    ParcelCategory,
    ParcelSize,
    ParcelRemark,
    BuildingPrice,
    BuildingType,
    BuildingStructure,
    BuildingSize,
    BuildingDate,
    BuildingRemark,
    Rent,
    MaintenanceCost,
    RepairFund,
    ManagementFee,
    Principal,
    Interest,
    Tax,
    WaterBill,
    ElectricBill,
    GasBill,
    FireInsurance,
    Other,
}

/// Form sections in display order.
pub const SECTIONS: [(&str, &[PropertyField]); 4] = [
    ("Project", &[PropertyField::ProjectName]),
    (
        "Parcel",
        &[
            PropertyField::ParcelPrice,
            PropertyField::ParcelAddress,
            PropertyField::ParcelCategory,
            PropertyField::ParcelSize,
            PropertyField::ParcelRemark,
        ],
    ),
    (
        "Building",
        &[
            PropertyField::BuildingPrice,
            PropertyField::BuildingType,
            PropertyField::BuildingStructure,
            PropertyField::BuildingSize,
            PropertyField::BuildingDate,
            PropertyField::BuildingRemark,
        ],
    ),
    (
        "Monthly income and expenses",
        &[
            PropertyField::Rent,
            PropertyField::MaintenanceCost,
            PropertyField::RepairFund,
            PropertyField::ManagementFee,
            PropertyField::Principal,
            PropertyField::Interest,
            PropertyField::Tax,
            PropertyField::WaterBill,
            PropertyField::ElectricBill,
            PropertyField::GasBill,
            PropertyField::FireInsurance,
            PropertyField::Other,
        ],
    ),
];

impl PropertyField {
    /// Wire name, also used as the [`FieldErrors`] key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::ProjectName => "projectName",
            Self::ParcelPrice => "parcelPrice",
            Self::ParcelAddress => "parcelAddress",
            Self::ParcelCategory => "parcelCategory",
            Self::ParcelSize => "parcelSize",
            Self::ParcelRemark => "parcelRemark",
            Self::BuildingPrice => "buildingPrice",
            Self::BuildingType => "buildingType",
            Self::BuildingStructure => "buildingStructure",
            Self::BuildingSize => "buildingSize",
            Self::BuildingDate => "buildingDate",
            Self::BuildingRemark => "buildingRemark",
            Self::Rent => "rent",
            Self::MaintenanceCost => "maintenanceCost",
            Self::RepairFund => "repairFund",
            Self::ManagementFee => "managementFee",
            Self::Principal => "principal",
            Self::Interest => "interest",
            Self::Tax => "tax",
            Self::WaterBill => "waterBill",
            Self::ElectricBill => "electricBill",
            Self::GasBill => "gasBill",
            Self::FireInsurance => "fireInsurance",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ProjectName => "Project name",
            Self::ParcelPrice => "Parcel price (¥)",
            Self::ParcelAddress => "Address",
            Self::ParcelCategory => "Land category",
            Self::ParcelSize => "Parcel area (m²)",
            Self::ParcelRemark => "Parcel remarks",
            Self::BuildingPrice => "Building price (¥)",
            Self::BuildingType => "Building type",
            Self::BuildingStructure => "Structure",
            Self::BuildingSize => "Floor area (m²)",
            Self::BuildingDate => "Completion date",
            Self::BuildingRemark => "Building remarks",
            Self::Rent => "Rent",
            Self::MaintenanceCost => "Maintenance",
            Self::RepairFund => "Repair reserve",
            Self::ManagementFee => "Management fee",
            Self::Principal => "Loan principal",
            Self::Interest => "Loan interest",
            Self::Tax => "Taxes",
            Self::WaterBill => "Water",
            Self::ElectricBill => "Electricity",
            Self::GasBill => "Gas",
            Self::FireInsurance => "Fire insurance",
            Self::Other => "Other notes",
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::ParcelPrice
            | Self::BuildingPrice
            | Self::Rent
            | Self::MaintenanceCost
            | Self::RepairFund
            | Self::ManagementFee
            | Self::Principal
            | Self::Interest
            | Self::Tax
            | Self::WaterBill
            | Self::ElectricBill
            | Self::GasBill
            | Self::FireInsurance => FieldKind::Amount,
            Self::ParcelSize | Self::BuildingSize => FieldKind::Area,
            Self::BuildingDate => FieldKind::Date,
            Self::BuildingType => FieldKind::BuildingType,
            Self::BuildingStructure => FieldKind::BuildingStructure,
            _ => FieldKind::Text,
        }
    }
}

/// Whole yen. Blank is 0; digit-group commas are accepted; negatives are not.
pub fn parse_amount(raw: &str) -> Result<i64, &'static str> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(0);
    }
    match cleaned.parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        Ok(_) => Err("Amounts cannot be negative."),
        Err(_) => Err("Enter a whole number."),
    }
}

/// Square metres. Blank is 0; must be finite and non-negative.
pub fn parse_area(raw: &str) -> Result<f64, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err("Enter a non-negative number."),
    }
}

fn format_area(value: f64) -> String {
    if value == 0.0 { String::new() } else { value.to_string() }
}

fn format_amount(value: i64) -> String {
    if value == 0 { String::new() } else { value.to_string() }
}

/// Editable form state for one property.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyDraft {
    id: Option<i64>,
    project_id: Option<i64>,
    values: BTreeMap<PropertyField, String>,
}

impl PropertyDraft {
    #[must_use]
    pub fn get(&self, field: PropertyField) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, field: PropertyField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    #[must_use]
    pub fn from_real_estate(property: &RealEstate) -> Self {
        let filled = property.filled();
        let project = filled.project.unwrap_or_default();
        let parcel = filled.parcel.unwrap_or_default();
        let building = filled.building.unwrap_or_default();
        let ie = filled.income_and_expenses.unwrap_or_default();

        let mut draft = Self { id: property.id, project_id: project.id, values: BTreeMap::new() };
        draft.set(PropertyField::ProjectName, project.project_name);
        draft.set(PropertyField::ParcelPrice, format_amount(parcel.parcel_price));
        draft.set(PropertyField::ParcelAddress, parcel.parcel_address);
        draft.set(PropertyField::ParcelCategory, parcel.parcel_category);
        draft.set(PropertyField::ParcelSize, format_area(parcel.parcel_size));
        draft.set(PropertyField::ParcelRemark, parcel.parcel_remark);
        draft.set(PropertyField::BuildingPrice, format_amount(building.building_price));
        draft.set(PropertyField::BuildingType, building.building_type);
        draft.set(PropertyField::BuildingStructure, building.building_structure);
        draft.set(PropertyField::BuildingSize, format_area(building.building_size));
        draft.set(PropertyField::BuildingDate, building.building_date);
        draft.set(PropertyField::BuildingRemark, building.building_remark);
        for (field, amount) in [
            (PropertyField::Rent, ie.rent),
            (PropertyField::MaintenanceCost, ie.maintenance_cost),
            (PropertyField::RepairFund, ie.repair_fund),
            (PropertyField::ManagementFee, ie.management_fee),
            (PropertyField::Principal, ie.principal),
            (PropertyField::Interest, ie.interest),
            (PropertyField::Tax, ie.tax),
            (PropertyField::WaterBill, ie.water_bill),
            (PropertyField::ElectricBill, ie.electric_bill),
            (PropertyField::GasBill, ie.gas_bill),
            (PropertyField::FireInsurance, ie.fire_insurance),
        ] {
            draft.set(field, format_amount(amount));
        }
        draft.set(PropertyField::Other, ie.other);
        draft
    }

    /// Parse every field into the wire record.
    ///
    /// # Errors
    ///
    /// Every offending field, keyed by [`PropertyField::key`].
    pub fn to_real_estate(&self) -> Result<RealEstate, FieldErrors> {
        let mut errors = FieldErrors::default();
        let mut amount = |field: PropertyField| match parse_amount(&self.get(field)) {
            Ok(value) => value,
            Err(message) => {
                errors.check(field.key(), Err(message));
                0
            }
        };

        let parcel_price = amount(PropertyField::ParcelPrice);
        let building_price = amount(PropertyField::BuildingPrice);
        let ie = IncomeAndExpenses {
            rent: amount(PropertyField::Rent),
            maintenance_cost: amount(PropertyField::MaintenanceCost),
            repair_fund: amount(PropertyField::RepairFund),
            management_fee: amount(PropertyField::ManagementFee),
            principal: amount(PropertyField::Principal),
            interest: amount(PropertyField::Interest),
            tax: amount(PropertyField::Tax),
            water_bill: amount(PropertyField::WaterBill),
            electric_bill: amount(PropertyField::ElectricBill),
            gas_bill: amount(PropertyField::GasBill),
            fire_insurance: amount(PropertyField::FireInsurance),
            other: self.get(PropertyField::Other).trim().to_owned(),
            is_deleted: false,
        };

        let mut area = |field: PropertyField| match parse_area(&self.get(field)) {
            Ok(value) => value,
            Err(message) => {
                errors.check(field.key(), Err(message));
                0.0
            }
        };
        let parcel_size = area(PropertyField::ParcelSize);
        let building_size = area(PropertyField::BuildingSize);

        let project_name = self.get(PropertyField::ProjectName).trim().to_owned();
        if project_name.is_empty() {
            errors.check(PropertyField::ProjectName.key(), Err("Enter a project name."));
        }
        let building_date = self.get(PropertyField::BuildingDate).trim().to_owned();
        if !building_date.is_empty() && chrono::NaiveDate::parse_from_str(&building_date, "%Y-%m-%d").is_err() {
            errors.check(PropertyField::BuildingDate.key(), Err("Use the YYYY-MM-DD format."));
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        let text = |field: PropertyField| self.get(field).trim().to_owned();
        Ok(RealEstate {
            id: self.id,
            project: Some(Project { id: self.project_id, project_name, is_deleted: false }),
            parcel: Some(Parcel {
                parcel_price,
                parcel_address: text(PropertyField::ParcelAddress),
                parcel_category: text(PropertyField::ParcelCategory),
                parcel_size,
                parcel_remark: text(PropertyField::ParcelRemark),
                is_deleted: false,
            }),
            building: Some(Building {
                building_price,
                building_type: text(PropertyField::BuildingType),
                building_structure: text(PropertyField::BuildingStructure),
                building_size,
                building_date,
                building_remark: text(PropertyField::BuildingRemark),
                is_deleted: false,
            }),
            income_and_expenses: Some(ie),
        })
    }
}

/// Input grid for every [`PropertyField`], grouped by section.
#[component]
pub fn PropertyFields(draft: RwSignal<PropertyDraft>, errors: RwSignal<FieldErrors>) -> impl IntoView {
    let input = move |field: PropertyField| {
        let value = move || draft.get().get(field);
        let on_input = move |ev: leptos::ev::Event| {
            let next = event_target_value(&ev);
            draft.update(|d| d.set(field, next));
            errors.update(|e| e.clear(field.key()));
        };
        match field.kind() {
            FieldKind::BuildingType | FieldKind::BuildingStructure => {
                let options = if field.kind() == FieldKind::BuildingType {
                    &BUILDING_TYPES[..]
                } else {
                    &BUILDING_STRUCTURES[..]
                };
                view! {
                    <select prop:value=value on:change=on_input>
                        <option value="">"Select..."</option>
                        {options
                            .iter()
                            .map(|(wire, label)| view! { <option value=*wire>{*label}</option> })
                            .collect_view()}
                    </select>
                }
                .into_any()
            }
            FieldKind::Date => view! { <input type="date" prop:value=value on:input=on_input/> }.into_any(),
            FieldKind::Amount | FieldKind::Area => {
                view! { <input type="text" inputmode="decimal" prop:value=value on:input=on_input/> }.into_any()
            }
            FieldKind::Text => view! { <input type="text" prop:value=value on:input=on_input/> }.into_any(),
        }
    };

    SECTIONS
        .iter()
        .map(|(title, fields)| {
            view! {
                <fieldset class="property-form__section">
                    <legend>{*title}</legend>
                    {fields
                        .iter()
                        .map(|field| {
                            let field = *field;
                            view! {
                                <label class="field">
                                    <span>{field.label()}</span>
                                    {input(field)}
                                    <Show when=move || errors.get().get(field.key()).is_some()>
                                        <span class="field__error">
                                            {move || errors.get().get(field.key()).unwrap_or_default()}
                                        </span>
                                    </Show>
                                </label>
                            }
                        })
                        .collect_view()}
                </fieldset>
            }
        })
        .collect_view()
}

#[component]
pub fn RegisterPropertyPage() -> impl IntoView {
    let store = expect_context::<AppStore>();
    let flash = expect_context::<Flash>();

    let draft = RwSignal::new(PropertyDraft::default());
    let errors = RwSignal::new(FieldErrors::default());
    let message = RwSignal::new(None::<(bool, String)>);
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let property = match draft.get_untracked().to_real_estate() {
            Ok(property) => property,
            Err(found) => {
                errors.set(found);
                message.set(Some((false, "Fix the highlighted fields.".to_owned())));
                return;
            }
        };
        errors.set(FieldErrors::default());
        message.set(None);
        submitting.set(true);
        let store = store.clone();
        spawn(async move {
            match api::register_property(&store, &property).await {
                Ok(()) => {
                    draft.set(PropertyDraft::default());
                    message.set(Some((true, PROPERTY_REGISTERED.to_owned())));
                }
                Err(e) => message.set(Some((false, api_error_text(&e, flash)))),
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="property-form">
            <h1>"Register property"</h1>
            <form on:submit=on_submit>
                <PropertyFields draft errors/>
                <div class="property-form__actions">
                    <button
                        class="button"
                        type="button"
                        on:click=move |_| {
                            draft.set(PropertyDraft::default());
                            errors.set(FieldErrors::default());
                            message.set(None);
                        }
                    >
                        "Clear"
                    </button>
                    <button class="button button--primary" type="submit" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Registering..." } else { "Register" }}
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
        </div>
    }
}
