use axum::http::{header, HeaderName, Method};
use metrics_exporter_prometheus::PrometheusHandle;
use mietcheck::billing::{
    BillingProvider, BillingService, RedirectPolicy, StripeBillingProvider,
    SupabaseIdentityProvider,
};
use mietcheck::config::BillingConfig;
use mietcheck::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the hosted identity and billing backends. Without a Stripe key the
/// service still starts and the billing endpoints answer 503.
pub(crate) fn billing_service(config: &BillingConfig) -> Result<BillingService, AppError> {
    let identity = SupabaseIdentityProvider::new(&config.supabase_url, &config.supabase_anon_key)?;

    let billing = match config.stripe_secret_key.as_deref() {
        Some(secret_key) => {
            Some(Arc::new(StripeBillingProvider::new(secret_key)?) as Arc<dyn BillingProvider>)
        }
        None => {
            warn!("STRIPE_SECRET_KEY not set; billing endpoints disabled");
            None
        }
    };

    Ok(BillingService::new(
        Arc::new(identity),
        billing,
        RedirectPolicy::from(config),
    ))
}

/// Browser clients call the API cross-origin; redirect targets are checked
/// separately by the billing service.
pub(crate) fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_is_disabled_without_secret_key() {
        let config = BillingConfig {
            supabase_url: "https://project.supabase.co".to_string(),
            supabase_anon_key: "anon".to_string(),
            ..BillingConfig::default()
        };

        let service = billing_service(&config).expect("service builds");

        assert!(!service.is_configured());
    }

    #[test]
    fn billing_is_enabled_with_secret_key() {
        let config = BillingConfig {
            stripe_secret_key: Some("sk_test_123".to_string()),
            supabase_url: "https://project.supabase.co".to_string(),
            supabase_anon_key: "anon".to_string(),
            ..BillingConfig::default()
        };

        let service = billing_service(&config).expect("service builds");

        assert!(service.is_configured());
    }
}
