//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub catalog: CatalogConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Remote REST API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join a path onto the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Session token lifetimes and background refresh settings
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: u64,
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl_secs: u64,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_expiry_skew")]
    pub expiry_skew_secs: u64,
    /// File holding the long-lived credentials; memory-only when unset
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl SessionConfig {
    #[must_use]
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    #[must_use]
    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_ttl_secs)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    #[must_use]
    pub fn expiry_skew(&self) -> Duration {
        Duration::from_secs(self.expiry_skew_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_token_ttl_secs: default_access_token_ttl(),
            refresh_token_ttl_secs: default_refresh_token_ttl(),
            refresh_interval_secs: default_refresh_interval(),
            expiry_skew_secs: default_expiry_skew(),
            credentials_path: None,
        }
    }
}

/// Catalogue listing settings
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroU32,
    #[serde(default = "default_sibling_count")]
    pub sibling_count: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sibling_count: default_sibling_count(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "storefront".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_access_token_ttl() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_ttl() -> u64 {
    2_592_000 // 30 days
}

fn default_refresh_interval() -> u64 {
    900 // 15 minutes
}

fn default_expiry_skew() -> u64 {
    30
}

fn default_page_size() -> NonZeroU32 {
    NonZeroU32::new(12).unwrap_or(NonZeroU32::MIN)
}

fn default_sibling_count() -> u32 {
    storefront_core::DEFAULT_SIBLING_COUNT
}

/// Parse an optional variable, keeping the default when it is unset
fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(raw) => match raw.to_lowercase().as_str() {
                "production" => Environment::Production,
                "staging" => Environment::Staging,
                "development" => Environment::Development,
                _ => return Err(ConfigError::InvalidValue("APP_ENV", raw)),
            },
            None => default_env(),
        };

        let base_url = lookup("API_BASE_URL").ok_or(ConfigError::MissingVar("API_BASE_URL"))?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue("API_BASE_URL", base_url));
        }

        let page_size: u32 = parse_or(&lookup, "PAGE_SIZE", default_page_size().get())?;
        let page_size = NonZeroU32::new(page_size)
            .ok_or_else(|| ConfigError::InvalidValue("PAGE_SIZE", page_size.to_string()))?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ApiConfig {
                base_url,
                timeout_secs: parse_or(&lookup, "API_TIMEOUT_SECS", default_timeout_secs())?,
            },
            session: SessionConfig {
                access_token_ttl_secs: parse_or(
                    &lookup,
                    "ACCESS_TOKEN_TTL_SECS",
                    default_access_token_ttl(),
                )?,
                refresh_token_ttl_secs: parse_or(
                    &lookup,
                    "REFRESH_TOKEN_TTL_SECS",
                    default_refresh_token_ttl(),
                )?,
                refresh_interval_secs: parse_or(
                    &lookup,
                    "SESSION_REFRESH_INTERVAL_SECS",
                    default_refresh_interval(),
                )?,
                expiry_skew_secs: parse_or(
                    &lookup,
                    "SESSION_EXPIRY_SKEW_SECS",
                    default_expiry_skew(),
                )?,
                credentials_path: lookup("CREDENTIALS_PATH")
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
            },
            catalog: CatalogConfig {
                page_size,
                sibling_count: parse_or(&lookup, "PAGE_SIBLING_COUNT", default_sibling_count())?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
