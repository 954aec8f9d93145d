//! Tenant-side compliance check for German rent increases (§§ 558 ff. BGB).
//!
//! The evaluator is a pure function of a [`RentIncreaseInput`]; the intake
//! module is the boundary that coerces raw form data before evaluation.

pub mod calendar;
mod defaults;
pub mod domain;
pub mod evaluation;
pub mod intake;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{
    Finding, FindingKind, FindingSeverity, Justification, JustificationKind, RentIncreaseInput,
};
pub use evaluation::{
    evaluate, EvaluationConfig, Recommendation, RentIncreaseAssessment, RentIncreaseEvaluator,
};
pub use intake::{IntakeError, RawField, RentIncreaseForm};
pub use router::{rent_increase_router, RentIncreaseCheckResponse};
