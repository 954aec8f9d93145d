use super::domain::{AuthenticatedUser, BillingCustomer, CheckoutSessionParams, SessionLink};

/// Failure reported by an identity or billing backend.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unreachable: {0}")]
    Transport(String),
    #[error("provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected provider response: {0}")]
    Decode(String),
}

/// Resolves bearer tokens to users (e.g., Supabase Auth).
#[axum::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn user_for_token(&self, token: &str)
        -> Result<Option<AuthenticatedUser>, ProviderError>;
}

/// Subscription billing backend (e.g., Stripe).
#[axum::async_trait]
pub trait BillingProvider: Send + Sync {
    async fn find_customer(&self, email: &str) -> Result<Option<BillingCustomer>, ProviderError>;

    async fn create_customer(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<BillingCustomer, ProviderError>;

    async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<SessionLink, ProviderError>;

    async fn create_portal_session(
        &self,
        customer: &BillingCustomer,
        return_url: &str,
    ) -> Result<SessionLink, ProviderError>;
}
