use chrono::Local;
use clap::Args;
use mietcheck::error::AppError;
use mietcheck::rent_increase::calendar::format_german;
use mietcheck::rent_increase::{
    Finding, RawField, RentIncreaseAssessment, RentIncreaseCheckResponse, RentIncreaseEvaluator,
    RentIncreaseForm, RentIncreaseInput,
};
use std::fmt::Write;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Monthly rent before the increase (EUR, `812,50` accepted)
    #[arg(long)]
    pub(crate) current_rent: String,
    /// Monthly rent demanded by the landlord (EUR)
    #[arg(long)]
    pub(crate) requested_rent: String,
    /// Living area in square metres
    #[arg(long)]
    pub(crate) living_area: String,
    /// Start of the tenancy (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) tenancy_start: String,
    /// Date of the last rent increase (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) last_increase: Option<String>,
    /// Date the increase letter was received (defaults to today)
    #[arg(long)]
    pub(crate) notice_received: Option<String>,
    /// Postal code of the flat
    #[arg(long)]
    pub(crate) postal_code: Option<String>,
    /// The municipality is a tight housing market (15% cap)
    #[arg(long)]
    pub(crate) dense_area: bool,
    /// rent_index, comparable_units or expert_opinion
    #[arg(long, default_value = "rent_index")]
    pub(crate) justification: String,
    /// The letter cites the local rent index
    #[arg(long)]
    pub(crate) rent_index_cited: bool,
    /// Rent per m² cited from comparable flats or the expert opinion
    #[arg(long)]
    pub(crate) cited_comparable_rent: Option<String>,
    /// Print the assessment as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

impl CheckArgs {
    fn into_form(self, today: &str) -> RentIncreaseForm {
        RentIncreaseForm {
            current_rent: Some(RawField::Text(self.current_rent)),
            requested_rent: Some(RawField::Text(self.requested_rent)),
            living_area_sqm: Some(RawField::Text(self.living_area)),
            tenancy_start: Some(self.tenancy_start),
            last_increase: self.last_increase,
            notice_received: Some(self.notice_received.unwrap_or_else(|| today.to_string())),
            postal_code: self.postal_code,
            dense_area: self.dense_area,
            justification_type: Some(self.justification),
            rent_index_cited: self.rent_index_cited,
            cited_comparable_rent: self.cited_comparable_rent.map(RawField::Text),
        }
    }
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let json = args.json;
    let input = args.into_form(&today).into_input()?;
    let assessment = RentIncreaseEvaluator::statutory().evaluate(&input);

    if json {
        let payload = RentIncreaseCheckResponse { input, assessment };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", render_report(&input, &assessment));
    }

    Ok(())
}

pub(crate) fn render_report(input: &RentIncreaseInput, assessment: &RentIncreaseAssessment) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, input, assessment);
    out
}

fn write_report(
    out: &mut String,
    input: &RentIncreaseInput,
    assessment: &RentIncreaseAssessment,
) -> std::fmt::Result {
    writeln!(out, "Rent increase check")?;
    writeln!(
        out,
        "Notice received {} | Justification: {}",
        format_german(input.notice_received),
        input.justification.kind().label()
    )?;
    if !input.postal_code.is_empty() {
        writeln!(out, "Postal code: {}", input.postal_code)?;
    }

    writeln!(out, "\nRent")?;
    writeln!(
        out,
        "- {:.2} EUR -> {:.2} EUR ({:+.2} EUR, {}%)",
        assessment.current_rent,
        assessment.requested_rent,
        assessment.increase_amount,
        assessment.increase_percent
    )?;
    writeln!(
        out,
        "- Per m²: {:.2} EUR -> {:.2} EUR",
        assessment.current_rent_per_sqm, assessment.new_rent_per_sqm
    )?;
    writeln!(
        out,
        "- Months since last increase: {} (waiting period {})",
        assessment.months_since_last_increase,
        if assessment.waiting_period_met {
            "met"
        } else {
            "not met"
        }
    )?;
    writeln!(
        out,
        "- Cap: {}% ({})",
        assessment.cap_percent,
        if assessment.cap_respected {
            "respected"
        } else {
            "exceeded"
        }
    )?;

    write_findings(out, "Violations", &assessment.violations)?;
    write_findings(out, "Warnings", &assessment.warnings)?;

    writeln!(
        out,
        "\nVerdict: {}",
        if assessment.lawful {
            "lawful"
        } else {
            "unlawful"
        }
    )?;
    writeln!(out, "Summary: {}", assessment.summary())?;
    writeln!(
        out,
        "Approval deadline: {}",
        assessment.approval_deadline_label
    )?;
    writeln!(out, "Recommendation: {}", assessment.recommendation_text)
}

fn write_findings(out: &mut String, title: &str, findings: &[Finding]) -> std::fmt::Result {
    if findings.is_empty() {
        return writeln!(out, "\n{title}: none");
    }

    writeln!(out, "\n{title}")?;
    for finding in findings {
        writeln!(
            out,
            "- [{}] {}: {}",
            finding.severity.label(),
            finding.kind.label(),
            finding.message
        )?;
    }
    Ok(())
}
