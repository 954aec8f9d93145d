use mietcheck::billing::{
    AuthenticatedUser, BillingCustomer, BillingProvider, CheckoutSessionParams, IdentityProvider,
    ProviderError, StripeBillingProvider, SupabaseIdentityProvider,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: "user-1".to_string(),
        email: Some("mieter@example.org".to_string()),
    }
}

#[tokio::test]
async fn supabase_resolves_user_for_valid_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-1",
            "email": "mieter@example.org",
            "aud": "authenticated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity =
        SupabaseIdentityProvider::new(&server.uri(), "anon-key").expect("client builds");
    let resolved = identity
        .user_for_token("token-123")
        .await
        .expect("lookup succeeds");

    assert_eq!(resolved, Some(user()));
}

#[tokio::test]
async fn supabase_treats_rejected_tokens_as_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "code": 401, "msg": "invalid JWT" })),
        )
        .mount(&server)
        .await;

    let identity =
        SupabaseIdentityProvider::new(&server.uri(), "anon-key").expect("client builds");

    let resolved = identity
        .user_for_token("expired")
        .await
        .expect("rejection is not an error");
    assert!(resolved.is_none());
}

#[tokio::test]
async fn supabase_surfaces_server_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let identity =
        SupabaseIdentityProvider::new(&server.uri(), "anon-key").expect("client builds");

    match identity.user_for_token("token-123").await {
        Err(ProviderError::Rejected { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("upstream down"));
        }
        other => panic!("expected rejected error, got {other:?}"),
    }
}

#[tokio::test]
async fn stripe_finds_existing_customer_by_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .and(query_param("email", "mieter@example.org"))
        .and(query_param("limit", "1"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(header("stripe-version", "2023-10-16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{ "id": "cus_existing", "object": "customer" }],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stripe =
        StripeBillingProvider::with_base_url("sk_test_123", &server.uri()).expect("client builds");
    let customer = stripe
        .find_customer("mieter@example.org")
        .await
        .expect("lookup succeeds");

    assert_eq!(
        customer,
        Some(BillingCustomer {
            id: "cus_existing".to_string()
        })
    );
}

#[tokio::test]
async fn stripe_returns_none_for_unknown_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "object": "list", "data": [] })),
        )
        .mount(&server)
        .await;

    let stripe =
        StripeBillingProvider::with_base_url("sk_test_123", &server.uri()).expect("client builds");

    let customer = stripe
        .find_customer("neu@example.org")
        .await
        .expect("lookup succeeds");
    assert!(customer.is_none());
}

#[tokio::test]
async fn stripe_creates_customer_tagged_with_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .and(body_string_contains("metadata%5Bsupabase_user_id%5D=user-1"))
        .and(body_string_contains("email=mieter%40example.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "cus_new" })))
        .expect(1)
        .mount(&server)
        .await;

    let stripe =
        StripeBillingProvider::with_base_url("sk_test_123", &server.uri()).expect("client builds");
    let customer = stripe
        .create_customer(&user())
        .await
        .expect("customer created");

    assert_eq!(customer.id, "cus_new");
}

#[tokio::test]
async fn stripe_checkout_session_requests_a_subscription() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(body_string_contains("mode=subscription"))
        .and(body_string_contains("line_items%5B0%5D%5Bquantity%5D=1"))
        .and(body_string_contains("metadata%5Buser_id%5D=user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_1",
            "url": "https://checkout.stripe.com/c/pay/cs_test_1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stripe =
        StripeBillingProvider::with_base_url("sk_test_123", &server.uri()).expect("client builds");
    let link = stripe
        .create_checkout_session(CheckoutSessionParams {
            customer_id: "cus_existing".to_string(),
            price_id: "price_1PremiumMonthly".to_string(),
            success_url: "https://mietcheck.example/billing/success".to_string(),
            cancel_url: "https://mietcheck.example/billing/cancel".to_string(),
            user_id: "user-1".to_string(),
        })
        .await
        .expect("session created");

    assert_eq!(link.url, "https://checkout.stripe.com/c/pay/cs_test_1");
}

#[tokio::test]
async fn stripe_errors_carry_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/billing_portal/sessions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "No such customer: 'cus_gone'",
                "type": "invalid_request_error"
            }
        })))
        .mount(&server)
        .await;

    let stripe =
        StripeBillingProvider::with_base_url("sk_test_123", &server.uri()).expect("client builds");
    let customer = BillingCustomer {
        id: "cus_gone".to_string(),
    };

    match stripe
        .create_portal_session(&customer, "https://mietcheck.example/account")
        .await
    {
        Err(ProviderError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "create portal session: No such customer: 'cus_gone'");
        }
        other => panic!("expected rejected error, got {other:?}"),
    }
}
