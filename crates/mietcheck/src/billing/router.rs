use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use super::domain::{CheckoutRequest, PortalRequest};
use super::service::{BillingError, BillingService};

/// Router exposing checkout and billing-portal session creation.
pub fn billing_router(service: Arc<BillingService>) -> Router {
    Router::new()
        .route(
            "/api/v1/billing/checkout-session",
            post(checkout_session_handler),
        )
        .route("/api/v1/billing/portal-session", post(portal_session_handler))
        .with_state(service)
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Bodies are decoded only after the provider and token checks, so a
/// malformed request never tells an anonymous caller more than 401 or 503.
fn decode_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, BillingError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| BillingError::InvalidBody(rejection.body_text()))
}

pub(crate) async fn checkout_session_handler(
    State(service): State<Arc<BillingService>>,
    headers: HeaderMap,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Response {
    let result = async {
        let caller = service.authorize(authorization(&headers)).await?;
        let request = decode_body(payload)?;
        service.checkout_for(caller, request).await
    }
    .await;

    match result {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn portal_session_handler(
    State(service): State<Arc<BillingService>>,
    headers: HeaderMap,
    payload: Result<Json<PortalRequest>, JsonRejection>,
) -> Response {
    let result = async {
        let caller = service.authorize(authorization(&headers)).await?;
        let request = decode_body(payload)?;
        service.portal_for(caller, request).await
    }
    .await;

    match result {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(error) => error.into_response(),
    }
}
