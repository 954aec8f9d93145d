use url::Url;

use crate::config::BillingConfig;

const PRICE_ID_PREFIX: &str = "price_";
const PRICE_ID_MIN_LEN: usize = 11;

/// Origins a checkout or portal session may send the browser back to.
#[derive(Debug, Clone, Default)]
pub struct RedirectPolicy {
    allowed_origins: Vec<String>,
    trusted_suffix: Option<String>,
}

impl RedirectPolicy {
    pub fn new(allowed_origins: Vec<String>, trusted_suffix: Option<String>) -> Self {
        let allowed_origins = allowed_origins
            .into_iter()
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let trusted_suffix = trusted_suffix
            .map(|suffix| suffix.trim().to_string())
            .filter(|suffix| !suffix.is_empty());

        Self {
            allowed_origins,
            trusted_suffix,
        }
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// True when `raw` parses and its origin is allow-listed or ends with
    /// the trusted suffix.
    pub fn allows(&self, raw: &str) -> bool {
        let Ok(parsed) = Url::parse(raw) else {
            return false;
        };
        let origin = parsed.origin();
        if !origin.is_tuple() {
            return false;
        }

        let origin = origin.ascii_serialization();
        self.allowed_origins.iter().any(|allowed| *allowed == origin)
            || self
                .trusted_suffix
                .as_deref()
                .is_some_and(|suffix| origin.ends_with(suffix))
    }
}

impl From<&BillingConfig> for RedirectPolicy {
    fn from(config: &BillingConfig) -> Self {
        Self::new(
            config.allowed_origins.clone(),
            config.trusted_origin_suffix.clone(),
        )
    }
}

/// Billing price identifiers look like `price_1Nx...`.
pub fn is_valid_price_id(price_id: &str) -> bool {
    price_id.starts_with(PRICE_ID_PREFIX) && price_id.len() >= PRICE_ID_MIN_LEN
}
