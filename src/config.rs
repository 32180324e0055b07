//! Application configuration
//!
//! Settings come from three layers, later ones winning:
//! an optional YAML file, `LUNCHLIST_*` environment variables, then CLI flags.

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::pagination::{SearchQuery, DEFAULT_MAX_CALLS};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LUNCHLIST_";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream API key, sent as a bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upstream base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// How many days a too-soon mark keeps a listing demoted
    #[serde(default = "default_too_soon_days")]
    pub too_soon_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            search: SearchConfig::default(),
            http: HttpConfig::default(),
            too_soon_days: default_too_soon_days(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.yelp.com/v3".to_string()
}

fn default_too_soon_days() -> u32 {
    3
}

// ============================================================================
// Search Config
// ============================================================================

/// Defaults for each search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search term
    #[serde(default = "default_term")]
    pub term: String,

    /// Radius in meters
    #[serde(default = "default_radius")]
    pub radius_meters: u32,

    /// Results per page
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Upstream calls allowed per fetch
    #[serde(default = "default_max_calls")]
    pub max_calls: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            term: default_term(),
            radius_meters: default_radius(),
            page_limit: default_page_limit(),
            max_calls: default_max_calls(),
        }
    }
}

fn default_term() -> String {
    "lunch".to_string()
}

fn default_radius() -> u32 {
    1000
}

fn default_page_limit() -> u32 {
    50
}

fn default_max_calls() -> u32 {
    DEFAULT_MAX_CALLS
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Transport-level retries per request (0 disables)
    #[serde(default)]
    pub max_retries: u32,

    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: 0,
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_initial_backoff() -> u64 {
    100
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from an optional file, then apply the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `LUNCHLIST_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).none_if_empty();

        if let Some(key) = var("API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = var("BASE_URL") {
            self.base_url = url;
        }
        if let Some(term) = var("TERM") {
            self.search.term = term;
        }
        if let Some(v) = var("RADIUS") {
            self.search.radius_meters = parse_env("RADIUS", &v)?;
        }
        if let Some(v) = var("PAGE_LIMIT") {
            self.search.page_limit = parse_env("PAGE_LIMIT", &v)?;
        }
        if let Some(v) = var("MAX_CALLS") {
            self.search.max_calls = parse_env("MAX_CALLS", &v)?;
        }
        Ok(())
    }

    /// Check values that would only fail later
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;
        if self.search.page_limit == 0 {
            return Err(Error::config("search.page_limit must be at least 1"));
        }
        if self.search.max_calls == 0 {
            return Err(Error::config("search.max_calls must be at least 1"));
        }
        if self.http.timeout_seconds == 0 {
            return Err(Error::config("http.timeout_seconds must be at least 1"));
        }
        Ok(())
    }

    /// HTTP client settings; requires an API key
    pub fn http_client_config(&self) -> Result<HttpClientConfig> {
        let api_key = self
            .api_key
            .clone()
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("api_key"))?;

        Ok(HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_secs(60),
            )
            .bearer_token(api_key)
            .build())
    }

    /// Query at the given coordinates using the configured defaults
    pub fn query_at(&self, latitude: &str, longitude: &str) -> SearchQuery {
        SearchQuery::new(&self.search.term, latitude, longitude)
            .with_radius(self.search.radius_meters)
            .with_page_limit(self.search.page_limit)
    }

    /// Too-soon window as a chrono duration
    pub fn too_soon_window(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.too_soon_days))
    }

    /// Copy with the API key masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(key) = &copy.api_key {
            let len = key.chars().count();
            let masked = if len <= 4 {
                "****".to_string()
            } else {
                let tail: String = key.chars().skip(len - 4).collect();
                format!("****{tail}")
            };
            copy.api_key = Some(masked);
        }
        copy
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| Error::InvalidConfigValue {
        field: format!("{ENV_PREFIX}{name}"),
        message: format!("'{value}': {e}"),
    })
}
