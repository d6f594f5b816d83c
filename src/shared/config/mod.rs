//! Application configuration module
//!
//! Configuration is assembled from environment variables (optionally loaded
//! from a `.env` file by the binary) or through [`AppConfigBuilder`]. A
//! configuration that fails validation must stop the server at startup:
//! without a store or an API key no request can ever succeed.
//!
//! # Environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | required |
//! | `PORT` | `5000` |
//! | `BOOQABLE_API_KEY` | required |
//! | `BOOQABLE_ACCOUNT_SUBDOMAIN` | none |
//! | `BOOQABLE_BASE_URLS` | derived from the subdomain |
//! | `BOOQABLE_TIMEOUT_SECS` | `10` |
//! | `BOOQABLE_DEADLINE_SECS` | `45` |
//! | `BOOQABLE_DISCOVERY_TTL_SECS` | `0` (no caching) |
//! | `SYNC_PER_PAGE` | `50` |
//! | `SYNC_MAX_PAGES` | `500` |
//! | `SYNC_FAILURE_POLICY` | `abort` |
//! | `BUSINESS_NAME` | `The Party Trailer` |
//! | `CORS_ORIGINS` | local Expo/Vite dev origins |

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DEADLINE_SECS: u64 = 45;
const DEFAULT_PER_PAGE: u32 = 50;
const DEFAULT_MAX_PAGES: u32 = 500;
const DEFAULT_BUSINESS_NAME: &str = "The Party Trailer";
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:19006",
    "http://localhost:19000",
    "http://127.0.0.1:19006",
    "http://127.0.0.1:19000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

/// What the synchronizer does when a single record fails to normalize or upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncFailurePolicy {
    /// Stop the whole pass on the first failing record
    #[default]
    Abort,
    /// Count the record as skipped and keep going
    Skip,
}

impl FromStr for SyncFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" | "skip-and-continue" | "continue" => Ok(Self::Skip),
            other => Err(ConfigError::InvalidValue {
                key: "SYNC_FAILURE_POLICY",
                value: other.to_string(),
            }),
        }
    }
}

/// Upstream (Booqable) connection settings
#[derive(Clone)]
pub struct BooqableSettings {
    /// API key; every auth scheme needs it
    pub api_key: String,
    /// Account subdomain used to build the tenant-specific base URL
    pub account_subdomain: Option<String>,
    /// Explicit candidate origins, replacing the derived ones when non-empty
    pub base_urls: Vec<String>,
    /// Timeout of a single outbound call
    pub request_timeout: Duration,
    /// Budget of a whole operation (probe sweep plus follow-up calls)
    pub operation_deadline: Duration,
    /// How long a discovered endpoint stays cached; zero disables caching
    pub discovery_ttl: Duration,
}

impl Default for BooqableSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            account_subdomain: None,
            base_urls: Vec::new(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            operation_deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
            discovery_ttl: Duration::ZERO,
        }
    }
}

impl std::fmt::Debug for BooqableSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BooqableSettings")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("account_subdomain", &self.account_subdomain)
            .field("base_urls", &self.base_urls)
            .field("request_timeout", &self.request_timeout)
            .field("operation_deadline", &self.operation_deadline)
            .field("discovery_ttl", &self.discovery_ttl)
            .finish()
    }
}

/// Pagination and failure handling of the synchronizers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub per_page: u32,
    /// Hard cap guarding against upstreams that never return an empty page
    pub max_pages: u32,
    pub failure_policy: SyncFailurePolicy,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            failure_policy: SyncFailurePolicy::Abort,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// sqlx connection string of the local store
    pub database_url: String,
    /// Listen port
    pub port: u16,
    pub booqable: BooqableSettings,
    pub sync: SyncSettings,
    /// Name used in customer-facing email drafts
    pub business_name: String,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut builder = AppConfig::builder();
        if let Some(url) = get("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(port) = get("PORT") {
            builder = builder.port(parse_value("PORT", &port)?);
        }
        if let Some(key) = get("BOOQABLE_API_KEY") {
            builder = builder.api_key(key);
        }
        if let Some(sub) = get("BOOQABLE_ACCOUNT_SUBDOMAIN") {
            builder = builder.account_subdomain(sub);
        }
        if let Some(bases) = get("BOOQABLE_BASE_URLS") {
            builder = builder.base_urls(split_list(&bases));
        }
        if let Some(secs) = get("BOOQABLE_TIMEOUT_SECS") {
            builder = builder.request_timeout(Duration::from_secs(parse_value(
                "BOOQABLE_TIMEOUT_SECS",
                &secs,
            )?));
        }
        if let Some(secs) = get("BOOQABLE_DEADLINE_SECS") {
            builder = builder.operation_deadline(Duration::from_secs(parse_value(
                "BOOQABLE_DEADLINE_SECS",
                &secs,
            )?));
        }
        if let Some(secs) = get("BOOQABLE_DISCOVERY_TTL_SECS") {
            builder = builder.discovery_ttl(Duration::from_secs(parse_value(
                "BOOQABLE_DISCOVERY_TTL_SECS",
                &secs,
            )?));
        }
        if let Some(per_page) = get("SYNC_PER_PAGE") {
            builder = builder.per_page(parse_value("SYNC_PER_PAGE", &per_page)?);
        }
        if let Some(max_pages) = get("SYNC_MAX_PAGES") {
            builder = builder.max_pages(parse_value("SYNC_MAX_PAGES", &max_pages)?);
        }
        if let Some(policy) = get("SYNC_FAILURE_POLICY") {
            builder = builder.failure_policy(policy.parse()?);
        }
        if let Some(name) = get("BUSINESS_NAME") {
            builder = builder.business_name(name);
        }
        if let Some(origins) = get("CORS_ORIGINS") {
            builder = builder.cors_origins(split_list(&origins));
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("DATABASE_URL"));
        }
        if self.booqable.api_key.trim().is_empty() {
            return Err(ConfigError::MissingValue("BOOQABLE_API_KEY"));
        }
        for base in &self.booqable.base_urls {
            let parsed =
                reqwest::Url::parse(base).map_err(|_| ConfigError::InvalidUrl(base.clone()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(base.clone()));
            }
        }
        if self.sync.per_page == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SYNC_PER_PAGE",
                value: "0".to_string(),
            });
        }
        if self.sync.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SYNC_MAX_PAGES",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug)]
pub struct AppConfigBuilder {
    database_url: Option<String>,
    port: u16,
    booqable: BooqableSettings,
    sync: SyncSettings,
    business_name: String,
    cors_origins: Vec<String>,
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self {
            database_url: None,
            port: DEFAULT_PORT,
            booqable: BooqableSettings::default(),
            sync: SyncSettings::default(),
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.booqable.api_key = key.into();
        self
    }

    pub fn account_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.booqable.account_subdomain = Some(subdomain.into());
        self
    }

    pub fn base_urls(mut self, bases: Vec<String>) -> Self {
        self.booqable.base_urls = bases;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.booqable.request_timeout = timeout;
        self
    }

    pub fn operation_deadline(mut self, deadline: Duration) -> Self {
        self.booqable.operation_deadline = deadline;
        self
    }

    pub fn discovery_ttl(mut self, ttl: Duration) -> Self {
        self.booqable.discovery_ttl = ttl;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.sync.per_page = per_page;
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.sync.max_pages = max_pages;
        self
    }

    pub fn failure_policy(mut self, policy: SyncFailurePolicy) -> Self {
        self.sync.failure_policy = policy;
        self
    }

    pub fn business_name(mut self, name: impl Into<String>) -> Self {
        self.business_name = name.into();
        self
    }

    pub fn cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            database_url: self
                .database_url
                .ok_or(ConfigError::MissingValue("DATABASE_URL"))?,
            port: self.port,
            booqable: self.booqable,
            sync: self.sync,
            business_name: self.business_name,
            cors_origins: self.cors_origins,
        };
        config.validate()?;
        Ok(config)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
