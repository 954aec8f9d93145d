use chrono::NaiveDate;

use super::calendar::sub_months;
use super::domain::{Justification, RentIncreaseInput};

const DEFAULT_CURRENT_RENT: f64 = 800.0;
const DEFAULT_REQUESTED_RENT: f64 = 900.0;
const DEFAULT_LIVING_AREA_SQM: f64 = 65.0;
const DEFAULT_TENANCY_MONTHS: u32 = 24;

impl RentIncreaseInput {
    /// Canonical starting point shown on first load and after a reset:
    /// a two-year tenancy receiving a 12.5% increase letter today.
    pub fn default_as_of(today: NaiveDate) -> Self {
        Self {
            current_rent: DEFAULT_CURRENT_RENT,
            requested_rent: DEFAULT_REQUESTED_RENT,
            living_area_sqm: DEFAULT_LIVING_AREA_SQM,
            tenancy_start: sub_months(today, DEFAULT_TENANCY_MONTHS),
            last_increase: None,
            notice_received: today,
            postal_code: String::new(),
            dense_area: false,
            justification: Justification::RentIndex { cited: false },
        }
    }
}
