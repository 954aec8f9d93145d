//! Subscription billing glue: bearer-token authentication, customer lookup,
//! and hosted checkout/portal session creation.

pub mod domain;
pub mod http;
pub mod provider;
pub mod redirect;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AuthenticatedUser, BillingCustomer, CheckoutRequest, CheckoutSessionParams, PortalRequest,
    SessionLink,
};
pub use http::{StripeBillingProvider, SupabaseIdentityProvider};
pub use provider::{BillingProvider, IdentityProvider, ProviderError};
pub use redirect::{is_valid_price_id, RedirectPolicy};
pub use router::billing_router;
pub use service::{BillingError, BillingService, Caller};
