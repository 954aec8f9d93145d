use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Justification, JustificationKind, RentIncreaseInput};

const POSTAL_CODE_DIGITS: usize = 5;

/// Errors raised while turning raw form values into a typed input.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("{field} must be a date formatted as YYYY-MM-DD (got '{value}')")]
    InvalidDate { field: &'static str, value: String },
    #[error("unknown justification type '{0}'")]
    UnknownJustification(String),
}

/// A form field as browsers and scripts send it: either already numeric or
/// free text typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
}

impl RawField {
    fn as_text(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.trim().to_string(),
        }
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Unvalidated calculator form. Every field is optional so that partially
/// filled forms still evaluate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentIncreaseForm {
    #[serde(default)]
    pub current_rent: Option<RawField>,
    #[serde(default)]
    pub requested_rent: Option<RawField>,
    #[serde(default)]
    pub living_area_sqm: Option<RawField>,
    #[serde(default)]
    pub tenancy_start: Option<String>,
    #[serde(default)]
    pub last_increase: Option<String>,
    #[serde(default)]
    pub notice_received: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub dense_area: bool,
    #[serde(default)]
    pub justification_type: Option<String>,
    #[serde(default)]
    pub rent_index_cited: bool,
    #[serde(default)]
    pub cited_comparable_rent: Option<RawField>,
}

impl RentIncreaseForm {
    /// Coerce the form into an evaluator input: numbers fall back to 0,
    /// optional values to absent, and only the justification detail that
    /// matches the selected type is carried over.
    pub fn into_input(self) -> Result<RentIncreaseInput, IntakeError> {
        let tenancy_start = required_date("tenancy_start", self.tenancy_start.as_deref())?;
        let notice_received = required_date("notice_received", self.notice_received.as_deref())?;
        let last_increase = self.last_increase.as_deref().and_then(optional_date);

        let kind = match self.justification_type.as_deref().map(str::trim) {
            None | Some("") => JustificationKind::RentIndex,
            Some(code) => JustificationKind::from_code(code)
                .ok_or_else(|| IntakeError::UnknownJustification(code.to_string()))?,
        };

        let cited_rent_per_sqm = self
            .cited_comparable_rent
            .as_ref()
            .map(parse_amount)
            .filter(|value| *value > 0.0);

        let justification = match kind {
            JustificationKind::RentIndex => Justification::RentIndex {
                cited: self.rent_index_cited,
            },
            JustificationKind::ComparableUnits => {
                Justification::ComparableUnits { cited_rent_per_sqm }
            }
            JustificationKind::ExpertOpinion => Justification::ExpertOpinion { cited_rent_per_sqm },
        };

        Ok(RentIncreaseInput {
            current_rent: self.current_rent.as_ref().map(parse_amount).unwrap_or(0.0),
            requested_rent: self.requested_rent.as_ref().map(parse_amount).unwrap_or(0.0),
            living_area_sqm: self
                .living_area_sqm
                .as_ref()
                .map(parse_amount)
                .unwrap_or(0.0),
            tenancy_start,
            last_increase,
            notice_received,
            postal_code: sanitize_postal_code(self.postal_code.as_deref().unwrap_or_default()),
            dense_area: self.dense_area,
            justification,
        })
    }
}

/// Parse a user-entered amount. German input (`812,50`) is accepted;
/// anything unparseable, negative, or non-finite becomes 0.
pub fn parse_amount(raw: &RawField) -> f64 {
    let parsed = match raw {
        RawField::Number(value) => Some(*value),
        RawField::Text(_) => raw.as_text().replace(',', ".").parse::<f64>().ok(),
    };

    match parsed {
        Some(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Keep digits only, at most five of them.
pub fn sanitize_postal_code(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(POSTAL_CODE_DIGITS)
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn optional_date(raw: &str) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        None
    } else {
        parse_date(raw)
    }
}

fn required_date(field: &'static str, raw: Option<&str>) -> Result<NaiveDate, IntakeError> {
    let raw = raw.unwrap_or_default();
    parse_date(raw).ok_or_else(|| IntakeError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}
