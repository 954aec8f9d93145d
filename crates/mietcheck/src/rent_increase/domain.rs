use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tenant-side view of a rent increase letter ("Mieterhöhungsverlangen").
///
/// The value is owned by the caller and replaced wholesale whenever a field
/// changes; the evaluator only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentIncreaseInput {
    pub current_rent: f64,
    pub requested_rent: f64,
    pub living_area_sqm: f64,
    pub tenancy_start: NaiveDate,
    #[serde(default)]
    pub last_increase: Option<NaiveDate>,
    pub notice_received: NaiveDate,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub dense_area: bool,
    pub justification: Justification,
}

impl RentIncreaseInput {
    /// Date the waiting period is measured from.
    pub fn reference_date(&self) -> NaiveDate {
        self.last_increase.unwrap_or(self.tenancy_start)
    }
}

/// How the landlord justified the increase. Each variant only carries the
/// detail that is meaningful for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Justification {
    RentIndex {
        cited: bool,
    },
    ComparableUnits {
        #[serde(default)]
        cited_rent_per_sqm: Option<f64>,
    },
    ExpertOpinion {
        #[serde(default)]
        cited_rent_per_sqm: Option<f64>,
    },
}

impl Justification {
    pub const fn kind(&self) -> JustificationKind {
        match self {
            Self::RentIndex { .. } => JustificationKind::RentIndex,
            Self::ComparableUnits { .. } => JustificationKind::ComparableUnits,
            Self::ExpertOpinion { .. } => JustificationKind::ExpertOpinion,
        }
    }

    pub fn cited_rent_per_sqm(&self) -> Option<f64> {
        match self {
            Self::RentIndex { .. } => None,
            Self::ComparableUnits { cited_rent_per_sqm }
            | Self::ExpertOpinion { cited_rent_per_sqm } => *cited_rent_per_sqm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JustificationKind {
    RentIndex,
    ComparableUnits,
    ExpertOpinion,
}

impl JustificationKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::RentIndex, Self::ComparableUnits, Self::ExpertOpinion]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RentIndex => "Rent index (Mietspiegel)",
            Self::ComparableUnits => "Comparable units",
            Self::ExpertOpinion => "Expert opinion",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::RentIndex => "rent_index",
            Self::ComparableUnits => "comparable_units",
            Self::ExpertOpinion => "expert_opinion",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|kind| kind.code() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    WaitingPeriod,
    RentCap,
    Justification,
}

impl FindingKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::WaitingPeriod => "Waiting period",
            Self::RentCap => "Rent cap",
            Self::Justification => "Justification",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    Critical,
    Medium,
    Low,
}

impl FindingSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Only critical findings make an increase unlawful.
    pub const fn blocks_lawfulness(self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// A single violation or advisory warning raised by a rule check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
    pub severity: FindingSeverity,
}

impl Finding {
    pub fn new(kind: FindingKind, severity: FindingSeverity, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity,
        }
    }
}
