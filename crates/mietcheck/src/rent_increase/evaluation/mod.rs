mod config;
mod policy;
pub(crate) mod rules;

pub use config::EvaluationConfig;
pub use policy::Recommendation;

use super::calendar::{add_months, format_german, round_display};
use super::domain::{Finding, RentIncreaseInput};
use chrono::NaiveDate;
use policy::decide_lawful;
use rules::{check_increase, RentMetrics};
use serde::{Deserialize, Serialize};

/// Stateless evaluator applying the statutory thresholds to an input.
#[derive(Debug, Clone, Default)]
pub struct RentIncreaseEvaluator {
    config: EvaluationConfig,
}

impl RentIncreaseEvaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn statutory() -> Self {
        Self::new(EvaluationConfig::statutory())
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(&self, input: &RentIncreaseInput) -> RentIncreaseAssessment {
        let metrics = RentMetrics::from_input(input);
        let rules = check_increase(input, &metrics, &self.config);

        let lawful = decide_lawful(&rules.violations);
        let recommendation = Recommendation::for_verdict(lawful);
        let approval_deadline =
            add_months(input.notice_received, self.config.approval_window_months);

        RentIncreaseAssessment {
            current_rent: input.current_rent,
            requested_rent: input.requested_rent,
            increase_amount: round_display(metrics.increase_amount, 2),
            increase_percent: round_display(metrics.increase_percent, 1),
            current_rent_per_sqm: round_display(metrics.current_rent_per_sqm, 2),
            new_rent_per_sqm: round_display(metrics.new_rent_per_sqm, 2),
            months_since_last_increase: metrics.months_since_last_increase,
            waiting_period_met: rules.waiting_period_met,
            cap_percent: rules.cap_percent,
            cap_respected: rules.cap_respected,
            violations: rules.violations,
            warnings: rules.warnings,
            lawful,
            approval_deadline,
            approval_deadline_label: format_german(approval_deadline),
            recommendation,
            recommendation_text: recommendation.text().to_string(),
        }
    }
}

/// Evaluate with the statutory thresholds.
pub fn evaluate(input: &RentIncreaseInput) -> RentIncreaseAssessment {
    RentIncreaseEvaluator::statutory().evaluate(input)
}

/// Verdict and display figures for one input. Amounts carry two decimals and
/// percentages one; the comparisons behind the flags used unrounded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentIncreaseAssessment {
    pub current_rent: f64,
    pub requested_rent: f64,
    pub increase_amount: f64,
    pub increase_percent: f64,
    pub current_rent_per_sqm: f64,
    pub new_rent_per_sqm: f64,
    pub months_since_last_increase: i32,
    pub waiting_period_met: bool,
    pub cap_percent: u8,
    pub cap_respected: bool,
    pub violations: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub lawful: bool,
    pub approval_deadline: NaiveDate,
    pub approval_deadline_label: String,
    pub recommendation: Recommendation,
    pub recommendation_text: String,
}

impl RentIncreaseAssessment {
    pub fn critical_violations(&self) -> impl Iterator<Item = &Finding> {
        self.violations
            .iter()
            .filter(|finding| finding.severity.blocks_lawfulness())
    }

    pub fn summary(&self) -> String {
        if self.lawful {
            "formally correct".to_string()
        } else {
            format!("{} issue(s) found", self.violations.len())
        }
    }
}
