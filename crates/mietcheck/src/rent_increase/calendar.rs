//! Statutory calendar arithmetic.
//!
//! Month counting ignores the day of month: a letter received on
//! 1 April counts as one month after any day in March.

use chrono::{Datelike, Days, Months, NaiveDate};

/// Whole calendar months from `from` to `to`, ignoring days. Negative when
/// `to` lies in an earlier month than `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

/// Adds calendar months. A day missing from the target month rolls over into
/// the following month (31 Dec + 2 months = 3 Mar, or 2 Mar in leap years).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(months)))
        .and_then(|first| first.checked_add_days(Days::new(u64::from(date.day() - 1))))
        .unwrap_or(NaiveDate::MAX)
}

/// Subtracts calendar months, clamping to the last day of the target month
/// (29 Feb - 24 months = 28 Feb).
pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// German short date, e.g. `05.03.2026`.
pub fn format_german(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Half-up rounding to `decimals` places, matching what the calculator UI
/// shows (`Math.round` semantics, so `-0.05` rounds to `-0.0`).
pub fn round_display(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor + 0.5).floor() / factor
}
