use serde::{Deserialize, Serialize};

/// Statutory thresholds applied by the evaluator (§§ 558, 558b BGB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub waiting_period_months: i32,
    pub dense_area_cap_percent: u8,
    pub standard_cap_percent: u8,
    pub approval_window_months: u32,
}

impl EvaluationConfig {
    pub const fn statutory() -> Self {
        Self {
            waiting_period_months: 15,
            dense_area_cap_percent: 15,
            standard_cap_percent: 20,
            approval_window_months: 2,
        }
    }

    pub const fn cap_percent(&self, dense_area: bool) -> u8 {
        if dense_area {
            self.dense_area_cap_percent
        } else {
            self.standard_cap_percent
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::statutory()
    }
}
