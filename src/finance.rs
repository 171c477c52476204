//! Yield and cash-flow arithmetic for the property list.
//!
//! All amounts are whole yen per month unless the name says otherwise.
//! Missing sections count as zero, so partially registered properties still
//! render a row.

#[cfg(test)]
#[path = "finance_test.rs"]
mod finance_test;

use chrono::{Datelike, NaiveDate};

use crate::net::types::{IncomeAndExpenses, RealEstate};

/// Sum of the ten monthly cost lines (rent and `other` excluded).
#[must_use]
pub fn monthly_expenses(ie: Option<&IncomeAndExpenses>) -> i64 {
    ie.map_or(0, |ie| {
        [
            ie.maintenance_cost,
            ie.repair_fund,
            ie.management_fee,
            ie.principal,
            ie.interest,
            ie.tax,
            ie.water_bill,
            ie.electric_bill,
            ie.gas_bill,
            ie.fire_insurance,
        ]
        .into_iter()
        .fold(0, i64::saturating_add)
    })
}

#[must_use]
pub fn monthly_rent(ie: Option<&IncomeAndExpenses>) -> i64 {
    ie.map_or(0, |ie| ie.rent)
}

#[must_use]
pub fn monthly_profit(ie: Option<&IncomeAndExpenses>) -> i64 {
    monthly_rent(ie).saturating_sub(monthly_expenses(ie))
}

/// Parcel price plus building price.
#[must_use]
pub fn acquisition_price(property: &RealEstate) -> i64 {
    let parcel = property.parcel.as_ref().map_or(0, |p| p.parcel_price);
    parcel.saturating_add(property.building.as_ref().map_or(0, |b| b.building_price))
}

#[allow(clippy::cast_precision_loss)]
fn annual_percent(monthly: i64, price: i64) -> f64 {
    monthly as f64 * 12.0 / price as f64 * 100.0
}

/// Annual rent over acquisition price, in percent.
#[must_use]
pub fn gross_yield(property: &RealEstate) -> f64 {
    let ie = property.income_and_expenses.as_ref();
    let price = acquisition_price(property);
    if monthly_rent(ie) == 0 || price == 0 {
        return 0.0;
    }
    annual_percent(monthly_rent(ie), price)
}

/// Annual rent minus annual expenses over acquisition price, in percent.
#[must_use]
pub fn net_yield(property: &RealEstate) -> f64 {
    let ie = property.income_and_expenses.as_ref();
    let price = acquisition_price(property);
    if monthly_rent(ie) == 0 || price == 0 {
        return 0.0;
    }
    annual_percent(monthly_profit(ie), price)
}

/// Footer row of the search list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub count: usize,
    pub acquisition_price: i64,
    pub rent: i64,
    pub expenses: i64,
    pub monthly_profit: i64,
}

impl Totals {
    #[must_use]
    pub fn of(properties: &[RealEstate]) -> Self {
        properties.iter().fold(Self { count: properties.len(), ..Self::default() }, |mut totals, p| {
            let ie = p.income_and_expenses.as_ref();
            totals.acquisition_price = totals.acquisition_price.saturating_add(acquisition_price(p));
            totals.rent = totals.rent.saturating_add(monthly_rent(ie));
            totals.expenses = totals.expenses.saturating_add(monthly_expenses(ie));
            totals.monthly_profit = totals.monthly_profit.saturating_add(monthly_profit(ie));
            totals
        })
    }

    #[must_use]
    pub fn average_acquisition_price(&self) -> i64 {
        match i64::try_from(self.count) {
            Ok(count) if count > 0 => self.acquisition_price / count,
            _ => 0,
        }
    }

    #[must_use]
    pub fn gross_yield(&self) -> f64 {
        if self.rent == 0 || self.acquisition_price == 0 {
            return 0.0;
        }
        annual_percent(self.rent, self.acquisition_price)
    }

    #[must_use]
    pub fn net_yield(&self) -> f64 {
        if self.rent == 0 || self.acquisition_price == 0 {
            return 0.0;
        }
        annual_percent(self.rent.saturating_sub(self.expenses), self.acquisition_price)
    }
}

/// Whole years between `building_date` (`YYYY-MM-DD`) and `today`, counting a
/// year only once its anniversary has passed. Future dates clamp to 0.
#[must_use]
pub fn building_age(building_date: &str, today: NaiveDate) -> Option<i32> {
    let raw = building_date.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    let built = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    let mut years = today.year() - built.year();
    if (today.month(), today.day()) < (built.month(), built.day()) {
        years -= 1;
    }
    Some(years.max(0))
}

/// `4.8` -> `"4.80%"`; zero and non-finite values render as `"0.00%"`.
#[must_use]
pub fn format_yield(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0.00%".to_owned();
    }
    format!("{value:.2}%")
}

/// `12000000` -> `"¥12,000,000"`.
#[must_use]
pub fn format_price(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 { format!("-¥{grouped}") } else { format!("¥{grouped}") }
}
