use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::domain::RentIncreaseInput;
use super::evaluation::{RentIncreaseAssessment, RentIncreaseEvaluator};
use super::intake::RentIncreaseForm;

#[derive(Debug, Serialize)]
pub struct RentIncreaseCheckResponse {
    pub input: RentIncreaseInput,
    pub assessment: RentIncreaseAssessment,
}

/// Router exposing the calculator: evaluation of a submitted form and the
/// default form values used on first load or reset.
pub fn rent_increase_router(evaluator: Arc<RentIncreaseEvaluator>) -> Router {
    Router::new()
        .route("/api/v1/rent-increase/check", post(check_handler))
        .route("/api/v1/rent-increase/defaults", get(defaults_handler))
        .with_state(evaluator)
}

pub(crate) async fn check_handler(
    State(evaluator): State<Arc<RentIncreaseEvaluator>>,
    payload: Result<Json<RentIncreaseForm>, JsonRejection>,
) -> Response {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
            });
            return (rejection.status(), Json(payload)).into_response();
        }
    };

    let input = match form.into_input() {
        Ok(input) => input,
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let assessment = evaluator.evaluate(&input);
    debug!(
        lawful = assessment.lawful,
        violations = assessment.violations.len(),
        warnings = assessment.warnings.len(),
        "rent increase evaluated"
    );

    (
        StatusCode::OK,
        Json(RentIncreaseCheckResponse { input, assessment }),
    )
        .into_response()
}

pub(crate) async fn defaults_handler() -> Json<RentIncreaseInput> {
    Json(RentIncreaseInput::default_as_of(Local::now().date_naive()))
}
