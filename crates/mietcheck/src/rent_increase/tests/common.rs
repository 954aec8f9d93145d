use axum::body::to_bytes;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::rent_increase::calendar::sub_months;
use crate::rent_increase::domain::{Justification, RentIncreaseInput};
use crate::rent_increase::intake::{RawField, RentIncreaseForm};

pub(super) fn notice_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

pub(super) fn months_before_notice(months: u32) -> NaiveDate {
    sub_months(notice_date(), months)
}

/// Two-year tenancy, first increase, 800 -> 900 with the rent index cited.
pub(super) fn lawful_input() -> RentIncreaseInput {
    RentIncreaseInput {
        current_rent: 800.0,
        requested_rent: 900.0,
        living_area_sqm: 65.0,
        tenancy_start: months_before_notice(24),
        last_increase: None,
        notice_received: notice_date(),
        postal_code: "10115".to_string(),
        dense_area: false,
        justification: Justification::RentIndex { cited: true },
    }
}

pub(super) fn input_with_rents(current_rent: f64, requested_rent: f64) -> RentIncreaseInput {
    RentIncreaseInput {
        current_rent,
        requested_rent,
        ..lawful_input()
    }
}

pub(super) fn form() -> RentIncreaseForm {
    RentIncreaseForm {
        current_rent: Some(RawField::from("800")),
        requested_rent: Some(RawField::from(900.0)),
        living_area_sqm: Some(RawField::from("65,5")),
        tenancy_start: Some("2024-10-18".to_string()),
        last_increase: Some(String::new()),
        notice_received: Some("2026-10-18".to_string()),
        postal_code: Some("10 115-9".to_string()),
        dense_area: false,
        justification_type: Some("rent_index".to_string()),
        rent_index_cited: true,
        cited_comparable_rent: Some(RawField::from("9,80")),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}
