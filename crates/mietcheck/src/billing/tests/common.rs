use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::billing::domain::{
    AuthenticatedUser, BillingCustomer, CheckoutRequest, CheckoutSessionParams, PortalRequest,
    SessionLink,
};
use crate::billing::provider::{BillingProvider, IdentityProvider, ProviderError};
use crate::billing::redirect::RedirectPolicy;
use crate::billing::service::BillingService;

pub(super) const VALID_TOKEN: &str = "token-123";
pub(super) const APP_ORIGIN: &str = "https://mietcheck.example";

pub(super) fn user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: "user-1".to_string(),
        email: Some("mieter@example.org".to_string()),
    }
}

pub(super) struct StaticIdentity {
    pub(super) user: AuthenticatedUser,
}

#[axum::async_trait]
impl IdentityProvider for StaticIdentity {
    async fn user_for_token(
        &self,
        token: &str,
    ) -> Result<Option<AuthenticatedUser>, ProviderError> {
        if token == VALID_TOKEN {
            Ok(Some(self.user.clone()))
        } else {
            Ok(None)
        }
    }
}

pub(super) struct UnreachableIdentity;

#[axum::async_trait]
impl IdentityProvider for UnreachableIdentity {
    async fn user_for_token(
        &self,
        _token: &str,
    ) -> Result<Option<AuthenticatedUser>, ProviderError> {
        Err(ProviderError::Transport("connection refused".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum BillingCall {
    FindCustomer(String),
    CreateCustomer(String),
    Checkout(CheckoutSessionParams),
    Portal { customer_id: String, return_url: String },
}

#[derive(Default)]
pub(super) struct MemoryBilling {
    pub(super) existing_customer: Option<String>,
    pub(super) fail_sessions: bool,
    calls: Mutex<Vec<BillingCall>>,
}

impl MemoryBilling {
    pub(super) fn with_customer(id: &str) -> Self {
        Self {
            existing_customer: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            fail_sessions: true,
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> Vec<BillingCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: BillingCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

#[axum::async_trait]
impl BillingProvider for MemoryBilling {
    async fn find_customer(&self, email: &str) -> Result<Option<BillingCustomer>, ProviderError> {
        self.record(BillingCall::FindCustomer(email.to_string()));
        Ok(self
            .existing_customer
            .as_ref()
            .map(|id| BillingCustomer { id: id.clone() }))
    }

    async fn create_customer(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<BillingCustomer, ProviderError> {
        self.record(BillingCall::CreateCustomer(user.id.clone()));
        Ok(BillingCustomer {
            id: "cus_new".to_string(),
        })
    }

    async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<SessionLink, ProviderError> {
        self.record(BillingCall::Checkout(params));
        if self.fail_sessions {
            return Err(ProviderError::Rejected {
                status: 400,
                message: "No such price".to_string(),
            });
        }
        Ok(SessionLink {
            url: "https://checkout.stripe.test/c/pay/cs_test".to_string(),
        })
    }

    async fn create_portal_session(
        &self,
        customer: &BillingCustomer,
        return_url: &str,
    ) -> Result<SessionLink, ProviderError> {
        self.record(BillingCall::Portal {
            customer_id: customer.id.clone(),
            return_url: return_url.to_string(),
        });
        Ok(SessionLink {
            url: "https://billing.stripe.test/p/session/test".to_string(),
        })
    }
}

pub(super) fn redirect_policy() -> RedirectPolicy {
    RedirectPolicy::new(vec![APP_ORIGIN.to_string()], Some(".preview.example".to_string()))
}

pub(super) fn build_service(billing: Option<Arc<MemoryBilling>>) -> BillingService {
    BillingService::new(
        Arc::new(StaticIdentity { user: user() }),
        billing.map(|billing| billing as Arc<dyn BillingProvider>),
        redirect_policy(),
    )
}

pub(super) fn bearer() -> String {
    format!("Bearer {VALID_TOKEN}")
}

pub(super) fn checkout_request() -> CheckoutRequest {
    CheckoutRequest {
        price_id: Some("price_1PremiumMonthly".to_string()),
        success_url: Some(format!("{APP_ORIGIN}/billing/success")),
        cancel_url: Some(format!("{APP_ORIGIN}/billing/cancel")),
    }
}

pub(super) fn portal_request() -> PortalRequest {
    PortalRequest {
        return_url: Some(format!("{APP_ORIGIN}/account")),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
