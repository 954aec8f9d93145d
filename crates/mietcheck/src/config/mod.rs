use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub billing: BillingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            billing: BillingConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Credentials and redirect policy for the subscription endpoints. A missing
/// secret key leaves billing disabled rather than failing startup.
#[derive(Clone, Default)]
pub struct BillingConfig {
    pub stripe_secret_key: Option<String>,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub allowed_origins: Vec<String>,
    pub trusted_origin_suffix: Option<String>,
}

impl BillingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let stripe_secret_key = non_empty_var("STRIPE_SECRET_KEY");
        let supabase_url = non_empty_var("SUPABASE_URL").unwrap_or_default();
        let supabase_anon_key = non_empty_var("SUPABASE_ANON_KEY").unwrap_or_default();

        if !supabase_url.is_empty()
            && !supabase_url.starts_with("https://")
            && !supabase_url.starts_with("http://")
        {
            return Err(ConfigError::InvalidSupabaseUrl(supabase_url));
        }

        let allowed_origins = match non_empty_var("BILLING_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        };

        Ok(Self {
            stripe_secret_key,
            supabase_url,
            supabase_anon_key,
            allowed_origins,
            trusted_origin_suffix: non_empty_var("BILLING_TRUSTED_ORIGIN_SUFFIX"),
        })
    }

    pub fn billing_enabled(&self) -> bool {
        self.stripe_secret_key.is_some()
    }
}

impl fmt::Debug for BillingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BillingConfig")
            .field(
                "stripe_secret_key",
                &self.stripe_secret_key.as_ref().map(|_| "<redacted>"),
            )
            .field("supabase_url", &self.supabase_url)
            .field("allowed_origins", &self.allowed_origins)
            .field("trusted_origin_suffix", &self.trusted_origin_suffix)
            .finish_non_exhaustive()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSupabaseUrl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSupabaseUrl(value) => {
                write!(f, "SUPABASE_URL must be an http(s) URL (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSupabaseUrl(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
