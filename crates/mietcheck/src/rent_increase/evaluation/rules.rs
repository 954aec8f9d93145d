use super::super::calendar::{months_between, round_display};
use super::super::domain::{
    Finding, FindingKind, FindingSeverity, Justification, RentIncreaseInput,
};
use super::config::EvaluationConfig;

/// Unrounded figures derived from the input. Every rule compares against
/// these; rounding only happens when the assessment is assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RentMetrics {
    pub increase_amount: f64,
    pub increase_percent: f64,
    pub current_rent_per_sqm: f64,
    pub new_rent_per_sqm: f64,
    pub months_since_last_increase: i32,
}

impl RentMetrics {
    pub(crate) fn from_input(input: &RentIncreaseInput) -> Self {
        let increase_amount = input.requested_rent - input.current_rent;
        let increase_percent = if input.current_rent > 0.0 {
            increase_amount / input.current_rent * 100.0
        } else {
            0.0
        };

        let (current_rent_per_sqm, new_rent_per_sqm) = if input.living_area_sqm > 0.0 {
            (
                input.current_rent / input.living_area_sqm,
                input.requested_rent / input.living_area_sqm,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            increase_amount,
            increase_percent,
            current_rent_per_sqm,
            new_rent_per_sqm,
            months_since_last_increase: months_between(
                input.reference_date(),
                input.notice_received,
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RuleOutcome {
    pub violations: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub waiting_period_met: bool,
    pub cap_percent: u8,
    pub cap_respected: bool,
}

/// Runs every rule; none of them short-circuits the others.
pub(crate) fn check_increase(
    input: &RentIncreaseInput,
    metrics: &RentMetrics,
    config: &EvaluationConfig,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    outcome.waiting_period_met = check_waiting_period(metrics, config, &mut outcome.violations);

    let cap_percent = config.cap_percent(input.dense_area);
    outcome.cap_percent = cap_percent;
    outcome.cap_respected = check_rent_cap(metrics, cap_percent, &mut outcome.violations);

    check_justification(
        &input.justification,
        &mut outcome.violations,
        &mut outcome.warnings,
    );

    outcome
}

fn check_waiting_period(
    metrics: &RentMetrics,
    config: &EvaluationConfig,
    violations: &mut Vec<Finding>,
) -> bool {
    let months = metrics.months_since_last_increase;
    let required = config.waiting_period_months;
    if months >= required {
        return true;
    }

    violations.push(Finding::new(
        FindingKind::WaitingPeriod,
        FindingSeverity::Critical,
        format!(
            "Wartezeit nicht eingehalten! Nur {months} statt mindestens {required} Monate seit der letzten Erhöhung."
        ),
    ));
    false
}

fn check_rent_cap(metrics: &RentMetrics, cap_percent: u8, violations: &mut Vec<Finding>) -> bool {
    if metrics.increase_percent <= f64::from(cap_percent) {
        return true;
    }

    violations.push(Finding::new(
        FindingKind::RentCap,
        FindingSeverity::Critical,
        format!(
            "Kappungsgrenze überschritten! Die Erhöhung beträgt {}%, maximal erlaubt sind {cap_percent}% in 3 Jahren.",
            round_display(metrics.increase_percent, 1)
        ),
    ));
    false
}

fn check_justification(
    justification: &Justification,
    violations: &mut Vec<Finding>,
    warnings: &mut Vec<Finding>,
) {
    match justification {
        Justification::RentIndex { cited: false } => violations.push(Finding::new(
            FindingKind::Justification,
            FindingSeverity::Medium,
            "Der Mietspiegel muss im Erhöhungsschreiben konkret benannt werden (Name, Ausgabe, Datum).",
        )),
        Justification::ComparableUnits { .. } => warnings.push(Finding::new(
            FindingKind::Justification,
            FindingSeverity::Low,
            "Bei Vergleichswohnungen müssen mindestens 3 konkrete Wohnungen mit Adresse genannt sein.",
        )),
        Justification::RentIndex { cited: true } | Justification::ExpertOpinion { .. } => {}
    }
}
