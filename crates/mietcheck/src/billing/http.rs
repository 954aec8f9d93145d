//! HTTP adapters for the hosted identity (Supabase Auth) and billing (Stripe)
//! backends.
//!
//! Each adapter wraps a `reqwest::Client` with its base URL and credentials.
//! Failures are mapped to [`ProviderError`]; retries are left to the caller.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::domain::{AuthenticatedUser, BillingCustomer, CheckoutSessionParams, SessionLink};
use super::provider::{BillingProvider, IdentityProvider, ProviderError};

const STRIPE_API_BASE: &str = "https://api.stripe.com";
const STRIPE_API_VERSION: &str = "2023-10-16";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn build_client(headers: HeaderMap) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .default_headers(headers)
        .build()
        .map_err(|err| ProviderError::Transport(format!("failed to build HTTP client: {err}")))
}

fn header_value(raw: &str) -> Result<HeaderValue, ProviderError> {
    HeaderValue::from_str(raw)
        .map_err(|_| ProviderError::Transport("credential contains invalid characters".into()))
}

async fn send(
    request: RequestBuilder,
    operation: &str,
) -> Result<reqwest::Response, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|err| ProviderError::Transport(format!("{operation}: {err}")))?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Rejected {
        status: status.as_u16(),
        message: format!("{operation}: {}", provider_message(&body)),
    })
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> Result<T, ProviderError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ProviderError::Decode(format!("{operation}: {err}")))
}

/// Pull the human readable message out of Stripe/Supabase error bodies.
fn provider_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct StripeEnvelope {
        error: StripeErrorBody,
    }
    #[derive(Deserialize)]
    struct StripeErrorBody {
        message: String,
    }
    #[derive(Deserialize)]
    struct SupabaseErrorBody {
        #[serde(alias = "error_description", alias = "message")]
        msg: String,
    }

    if let Ok(envelope) = serde_json::from_str::<StripeEnvelope>(body) {
        return envelope.error.message;
    }
    if let Ok(error) = serde_json::from_str::<SupabaseErrorBody>(body) {
        return error.msg;
    }
    body.chars().take(200).collect()
}

/// Resolves access tokens through `GET {base}/auth/v1/user`.
#[derive(Debug, Clone)]
pub struct SupabaseIdentityProvider {
    client: Client,
    base_url: String,
}

impl SupabaseIdentityProvider {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(anon_key)?);

        Ok(Self {
            client: build_client(headers)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[axum::async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn user_for_token(
        &self,
        token: &str,
    ) -> Result<Option<AuthenticatedUser>, ProviderError> {
        let request = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);

        match send(request, "fetch user").await {
            Ok(response) => {
                let user: SupabaseUser = decode(response, "fetch user").await?;
                Ok(Some(AuthenticatedUser {
                    id: user.id,
                    email: user.email.filter(|email| !email.is_empty()),
                }))
            }
            Err(ProviderError::Rejected { status, .. })
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Stripe REST v1 client using form-encoded requests.
#[derive(Debug, Clone)]
pub struct StripeBillingProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StripeObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    #[serde(default)]
    url: Option<String>,
}

impl StripeBillingProvider {
    pub fn new(secret_key: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(secret_key, STRIPE_API_BASE)
    }

    pub fn with_base_url(secret_key: &str, base_url: &str) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {secret_key}"))?);
        headers.insert("Stripe-Version", HeaderValue::from_static(STRIPE_API_VERSION));

        Ok(Self {
            client: build_client(headers)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url)
    }

    async fn session_link(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<SessionLink, ProviderError> {
        let session: StripeSession = decode(response, operation).await?;
        session
            .url
            .map(|url| SessionLink { url })
            .ok_or_else(|| ProviderError::Decode(format!("{operation}: session without url")))
    }
}

#[axum::async_trait]
impl BillingProvider for StripeBillingProvider {
    async fn find_customer(&self, email: &str) -> Result<Option<BillingCustomer>, ProviderError> {
        let request = self
            .client
            .get(self.endpoint("customers"))
            .query(&[("email", email), ("limit", "1")]);
        let response = send(request, "list customers").await?;
        let customers: StripeList<StripeObject> = decode(response, "list customers").await?;

        Ok(customers
            .data
            .into_iter()
            .next()
            .map(|customer| BillingCustomer { id: customer.id }))
    }

    async fn create_customer(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<BillingCustomer, ProviderError> {
        let mut form = vec![("metadata[supabase_user_id]", user.id.as_str())];
        if let Some(email) = user.email.as_deref() {
            form.push(("email", email));
        }

        let request = self.client.post(self.endpoint("customers")).form(&form);
        let response = send(request, "create customer").await?;
        let customer: StripeObject = decode(response, "create customer").await?;
        Ok(BillingCustomer { id: customer.id })
    }

    async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<SessionLink, ProviderError> {
        let form = [
            ("customer", params.customer_id.as_str()),
            ("line_items[0][price]", params.price_id.as_str()),
            ("line_items[0][quantity]", "1"),
            ("mode", "subscription"),
            ("success_url", params.success_url.as_str()),
            ("cancel_url", params.cancel_url.as_str()),
            ("metadata[user_id]", params.user_id.as_str()),
            ("subscription_data[metadata][user_id]", params.user_id.as_str()),
        ];

        let request = self
            .client
            .post(self.endpoint("checkout/sessions"))
            .form(&form);
        let response = send(request, "create checkout session").await?;
        Self::session_link(response, "create checkout session").await
    }

    async fn create_portal_session(
        &self,
        customer: &BillingCustomer,
        return_url: &str,
    ) -> Result<SessionLink, ProviderError> {
        let form = [
            ("customer", customer.id.as_str()),
            ("return_url", return_url),
        ];

        let request = self
            .client
            .post(self.endpoint("billing_portal/sessions"))
            .form(&form);
        let response = send(request, "create portal session").await?;
        Self::session_link(response, "create portal session").await
    }
}
