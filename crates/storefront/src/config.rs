//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `AIRSHOP_API_URL` - Backend REST API base URL (default: `http://localhost:5000/api`)
//! - `AIRSHOP_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)
//! - `AIRSHOP_DATA_DIR` - Directory for the local key-value store (default: `.airshop`)
//! - `AIRSHOP_PAYMENT_MODE` - `test` or `production` (default: `test`)
//! - `AIRSHOP_RETURN_URL` - Where the payment gateway sends the shopper back
//!   (default: `http://localhost:3000/payment/success`)
//! - `AIRSHOP_CURRENCY` - Order currency (default: `RUB`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use airshop_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_DATA_DIR: &str = ".airshop";
const DEFAULT_RETURN_URL: &str = "http://localhost:3000/payment/success";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API connection settings
    pub api: ApiConfig,
    /// Checkout and payment settings
    pub checkout: CheckoutConfig,
    /// Directory holding the file-backed key-value store
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Backend REST API connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to, without trailing slash
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Whether online payments go through the real gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMode {
    /// Online payments are confirmed locally without contacting the gateway.
    #[default]
    Test,
    /// Online payments are created through the backend and the shopper is
    /// redirected to the gateway.
    Production,
}

impl std::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "invalid payment mode: {other}. Must be one of: test, production"
            )),
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Test => "test",
            Self::Production => "production",
        })
    }
}

/// Checkout and payment settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub payment_mode: PaymentMode,
    /// Gateway return URL after payment
    pub return_url: String,
    /// Currency sent with payment requests
    pub currency: CurrencyCode,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            payment_mode: PaymentMode::Test,
            return_url: DEFAULT_RETURN_URL.to_string(),
            currency: CurrencyCode::RUB,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig {
            base_url: parse_http_url(
                "AIRSHOP_API_URL",
                &get_env_or_default("AIRSHOP_API_URL", DEFAULT_API_URL),
            )?,
            timeout: parse_timeout(
                "AIRSHOP_API_TIMEOUT_SECS",
                &get_env_or_default("AIRSHOP_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            )?,
        };

        let checkout = CheckoutConfig {
            payment_mode: get_env_or_default("AIRSHOP_PAYMENT_MODE", "test")
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("AIRSHOP_PAYMENT_MODE".to_string(), e))?,
            return_url: parse_http_url(
                "AIRSHOP_RETURN_URL",
                &get_env_or_default("AIRSHOP_RETURN_URL", DEFAULT_RETURN_URL),
            )?,
            currency: get_env_or_default("AIRSHOP_CURRENCY", "RUB")
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("AIRSHOP_CURRENCY".to_string(), e))?,
        };

        let data_dir = PathBuf::from(get_env_or_default("AIRSHOP_DATA_DIR", DEFAULT_DATA_DIR));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api,
            checkout,
            data_dir,
            sentry_dsn,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate an absolute http(s) URL and strip any trailing slash, so
/// endpoint paths starting with `/` can be appended directly.
fn parse_http_url(var_name: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Parse a positive whole number of seconds.
fn parse_timeout(var_name: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string())
        })?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse an API base URL given on the command line.
///
/// # Errors
///
/// Returns an error if `value` is not an absolute http(s) URL.
pub fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    parse_http_url("base URL", value)
}
