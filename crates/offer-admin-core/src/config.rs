//! Configuration management for the offer admin client

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `OFFER_ADMIN_API__BASE_URL`
pub const ENV_PREFIX: &str = "OFFER_ADMIN";

/// Upper bound on configured retries; `2^16` seconds is already most of a day
pub const MAX_CONFIGURED_RETRIES: u32 = 16;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Rate-limit retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Credential configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token used for admin requests
    #[serde(default)]
    pub token: Option<String>,

    /// File holding a `Cookie` header line with a `token` cookie
    #[serde(default)]
    pub cookie_file: Option<PathBuf>,
}

/// Retry configuration for rate-limited offer fetches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds; doubles per retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_timeout_seconds() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    5
}

const fn default_base_delay_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from an optional `offer-admin` file in the working
    /// directory and `OFFER_ADMIN_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        Self::build(config::File::with_name("offer-admin").required(false))
    }

    /// Load configuration from an explicit file, still honouring the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or the result fails validation.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> crate::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that serde alone cannot constrain
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field.
    pub fn validate(&self) -> crate::Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(crate::Error::validation("api.base_url", "must not be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(crate::Error::validation(
                "api.base_url",
                "must start with http:// or https://",
            ));
        }
        if self.api.timeout_seconds == 0 {
            return Err(crate::Error::validation(
                "api.timeout_seconds",
                "must be greater than zero",
            ));
        }
        if self.retry.max_retries > MAX_CONFIGURED_RETRIES {
            return Err(crate::Error::validation(
                "retry.max_retries",
                format!("must be at most {MAX_CONFIGURED_RETRIES}"),
            ));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(crate::Error::validation(
                "logging.format",
                "must be json or pretty",
            ));
        }
        Ok(())
    }
}
