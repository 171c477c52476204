use super::*;
use crate::net::types::{Building, IncomeAndExpenses, Parcel, Project};

fn sample() -> RealEstate {
    RealEstate {
        id: Some(1),
        project: Some(Project { id: Some(10), project_name: "Sakura".to_owned(), is_deleted: false }),
        parcel: Some(Parcel {
            parcel_price: 5_000_000,
            parcel_address: "Tokyo".to_owned(),
            ..Parcel::default()
        }),
        building: Some(Building {
            building_price: 5_000_000,
            building_type: "アパート".to_owned(),
            building_date: "2000-06-15".to_owned(),
            ..Building::default()
        }),
        income_and_expenses: Some(IncomeAndExpenses { rent: 50_000, tax: 10_000, ..IncomeAndExpenses::default() }),
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn row_formats_money_and_yields() {
    let row = PropertyRow::new(&sample(), day(2024, 6, 15));
    assert_eq!(row.project_name, "Sakura");
    assert_eq!(row.address, "Tokyo");
    assert_eq!(row.structure, "-");
    assert_eq!(row.age, "24 yrs");
    assert_eq!(row.acquisition_price, "¥10,000,000");
    assert_eq!(row.rent, "¥50,000");
    assert_eq!(row.monthly_profit, "¥40,000");
    assert_eq!(row.gross_yield, "6.00%");
    assert_eq!(row.net_yield, "4.80%");
}

#[test]
fn empty_record_renders_placeholders() {
    let row = PropertyRow::new(&RealEstate::default(), day(2024, 1, 1));
    assert_eq!(row.project_name, "-");
    assert_eq!(row.age, "-");
    assert_eq!(row.acquisition_price, "¥0");
    assert_eq!(row.gross_yield, "0.00%");
}

#[test]
fn detail_lines_include_expenses_and_yields() {
    let lines = detail_lines(&sample(), day(2024, 6, 15));
    let lookup = |label: &str| lines.iter().find(|(l, _)| *l == label).map(|(_, v)| v.clone());
    assert_eq!(lookup("Monthly expenses").as_deref(), Some("¥10,000"));
    assert_eq!(lookup("Net yield").as_deref(), Some("4.80%"));
    assert_eq!(lookup("Notes").as_deref(), Some("-"));
}
