use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, info, warn};

use super::domain::{
    AuthenticatedUser, CheckoutRequest, CheckoutSessionParams, PortalRequest, SessionLink,
};
use super::provider::{BillingProvider, IdentityProvider, ProviderError};
use super::redirect::{is_valid_price_id, RedirectPolicy};

const BEARER_PREFIX: &str = "Bearer ";

/// Errors surfaced to billing clients; each maps to one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Validation(&'static str),
    #[error("Service temporarily unavailable")]
    ServiceUnavailable,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("{0}")]
    Internal(String),
}

impl BillingError {
    pub fn status(&self) -> StatusCode {
        match self {
            BillingError::Unauthorized => StatusCode::UNAUTHORIZED,
            BillingError::Validation(_) | BillingError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            BillingError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            BillingError::NotFound(_) => StatusCode::NOT_FOUND,
            BillingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProviderError> for BillingError {
    fn from(value: ProviderError) -> Self {
        error!(error = %value, "billing provider call failed");
        Self::Internal(value.to_string())
    }
}

impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// A caller that passed the configuration and bearer-token checks.
pub struct Caller {
    billing: Arc<dyn BillingProvider>,
    user: AuthenticatedUser,
}

/// Creates checkout and portal sessions for authenticated users. The billing
/// provider is optional so a deployment without credentials still starts and
/// answers 503.
pub struct BillingService {
    identity: Arc<dyn IdentityProvider>,
    billing: Option<Arc<dyn BillingProvider>>,
    redirects: RedirectPolicy,
}

impl BillingService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        billing: Option<Arc<dyn BillingProvider>>,
        redirects: RedirectPolicy,
    ) -> Self {
        Self {
            identity,
            billing,
            redirects,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.billing.is_some()
    }

    /// Provider configuration first, then the bearer token. Request bodies
    /// are only looked at once this passes.
    pub async fn authorize(&self, authorization: Option<&str>) -> Result<Caller, BillingError> {
        let billing = self.billing()?.clone();
        let user = self.authenticate(authorization).await?;
        Ok(Caller { billing, user })
    }

    pub async fn create_checkout_session(
        &self,
        authorization: Option<&str>,
        request: CheckoutRequest,
    ) -> Result<SessionLink, BillingError> {
        let caller = self.authorize(authorization).await?;
        self.checkout_for(caller, request).await
    }

    pub async fn create_portal_session(
        &self,
        authorization: Option<&str>,
        request: PortalRequest,
    ) -> Result<SessionLink, BillingError> {
        let caller = self.authorize(authorization).await?;
        self.portal_for(caller, request).await
    }

    /// Open a subscription checkout for the caller, creating the billing
    /// customer on first purchase.
    pub async fn checkout_for(
        &self,
        caller: Caller,
        request: CheckoutRequest,
    ) -> Result<SessionLink, BillingError> {
        let Caller { billing, user } = caller;

        let (Some(price_id), Some(success_url), Some(cancel_url)) = (
            non_empty(request.price_id),
            non_empty(request.success_url),
            non_empty(request.cancel_url),
        ) else {
            return Err(BillingError::Validation("Missing required fields"));
        };

        if !is_valid_price_id(&price_id) {
            return Err(BillingError::Validation("Invalid price ID format"));
        }

        if !self.redirects.allows(&success_url) || !self.redirects.allows(&cancel_url) {
            warn!(%success_url, %cancel_url, "rejected checkout redirect urls");
            return Err(BillingError::Validation("Invalid redirect URLs"));
        }

        let existing = match user.email.as_deref() {
            Some(email) => billing.find_customer(email).await?,
            None => None,
        };
        let customer = match existing {
            Some(customer) => customer,
            None => {
                let customer = billing.create_customer(&user).await?;
                info!(user_id = %user.id, customer_id = %customer.id, "created billing customer");
                customer
            }
        };

        let session = billing
            .create_checkout_session(CheckoutSessionParams {
                customer_id: customer.id,
                price_id,
                success_url,
                cancel_url,
                user_id: user.id.clone(),
            })
            .await?;

        info!(user_id = %user.id, "checkout session created");
        Ok(session)
    }

    /// Open the self-service portal for a caller who already has a billing
    /// customer.
    pub async fn portal_for(
        &self,
        caller: Caller,
        request: PortalRequest,
    ) -> Result<SessionLink, BillingError> {
        let Caller { billing, user } = caller;

        let Some(return_url) = non_empty(request.return_url) else {
            return Err(BillingError::Validation("Missing required field"));
        };

        if !self.redirects.allows(&return_url) {
            warn!(%return_url, "rejected portal return url");
            return Err(BillingError::Validation("Invalid return URL"));
        }

        let customer = match user.email.as_deref() {
            Some(email) => billing.find_customer(email).await?,
            None => None,
        }
        .ok_or(BillingError::NotFound("No subscription found"))?;

        let session = billing
            .create_portal_session(&customer, &return_url)
            .await?;

        info!(user_id = %user.id, "portal session created");
        Ok(session)
    }

    fn billing(&self) -> Result<&Arc<dyn BillingProvider>, BillingError> {
        self.billing.as_ref().ok_or_else(|| {
            error!("billing provider not configured");
            BillingError::ServiceUnavailable
        })
    }

    async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedUser, BillingError> {
        let token = authorization
            .and_then(|header| header.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(BillingError::Unauthorized)?;

        match self.identity.user_for_token(token).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(BillingError::Unauthorized),
            Err(err) => {
                warn!(error = %err, "token lookup failed");
                Err(BillingError::Unauthorized)
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
