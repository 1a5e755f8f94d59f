//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TOOLLINK_API_URL` - Base URL of the inventory backend (e.g., `https://api.toollink.example/api`)
//!
//! ## Optional
//! - `TOOLLINK_API_TOKEN` - Bearer token sent with every request
//! - `TOOLLINK_TOKEN_FILE` - File holding the bearer token (used when `TOOLLINK_API_TOKEN` is unset)
//! - `TOOLLINK_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `TOOLLINK_DEFAULT_WAREHOUSE` - Warehouse preselected in new forms (default: W1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use toollink_core::Warehouse;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Cannot read token file {path}: {source}")]
    TokenFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Inventory client configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend base URL; endpoint paths are appended to it
    pub api_url: Url,
    /// Bearer token, if one was configured
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Warehouse preselected for new items
    pub default_warehouse: Warehouse,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("default_warehouse", &self.default_warehouse)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration for `api_url` with every optional setting at its default.
    #[must_use]
    pub const fn new(api_url: Url) -> Self {
        Self {
            api_url,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_warehouse: toollink_core::DEFAULT_WAREHOUSE,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL is missing or malformed, a
    /// numeric setting does not parse, or the token file cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);

        let api_url = parse_api_url(&env.required("TOOLLINK_API_URL")?)?;
        let token = load_token(&env)?;
        let timeout = env
            .or_default("TOOLLINK_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TOOLLINK_TIMEOUT_SECS".to_string(), e.to_string())
            })
            .map(Duration::from_secs)?;
        let default_warehouse = env
            .optional("TOOLLINK_DEFAULT_WAREHOUSE")
            .map(|raw| {
                Warehouse::parse_lenient(&raw).ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "TOOLLINK_DEFAULT_WAREHOUSE".to_string(),
                        format!("unknown warehouse: {raw}"),
                    )
                })
            })
            .transpose()?
            .unwrap_or(toollink_core::DEFAULT_WAREHOUSE);
        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            api_url,
            token,
            timeout,
            default_warehouse,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Parse the base URL, requiring an absolute http(s) URL.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid =
        |reason: String| ConfigError::InvalidEnvVar("TOOLLINK_API_URL".to_string(), reason);
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid(format!("not an http(s) base URL: {raw}")));
    }
    Ok(url)
}

/// Token from `TOOLLINK_API_TOKEN`, else the trimmed contents of `TOOLLINK_TOKEN_FILE`.
fn load_token<F: Fn(&str) -> Option<String>>(
    env: &Lookup<F>,
) -> Result<Option<SecretString>, ConfigError> {
    let token = match env.optional("TOOLLINK_API_TOKEN") {
        Some(token) => Some(token),
        None => match env.optional("TOOLLINK_TOKEN_FILE") {
            Some(path) => {
                let path = PathBuf::from(path);
                let contents = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::TokenFile { path, source })?;
                Some(contents.trim().to_string()).filter(|t| !t.is_empty())
            }
            None => None,
        },
    };

    Ok(token.map(|token| {
        if let Some(pattern) = placeholder_pattern(&token) {
            tracing::warn!("API token looks like a placeholder (contains '{pattern}')");
        }
        SecretString::from(token)
    }))
}

fn placeholder_pattern(secret: &str) -> Option<&'static str> {
    let lower = secret.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lower.contains(pattern))
}

/// Expose the token for an `Authorization` header.
pub(crate) fn bearer(token: &SecretString) -> &str {
    token.expose_secret()
}
