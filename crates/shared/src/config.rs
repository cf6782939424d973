//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Bank of Israel feeds for USD, GBP and EUR.
const DEFAULT_SOURCE_URLS: [&str; 3] = [
    "https://www.boi.org.il/currency.xml?curr=01",
    "https://www.boi.org.il/currency.xml?curr=02",
    "https://www.boi.org.il/currency.xml?curr=27",
];

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Rate feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// One remote exchange-rate document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// Document URL.
    pub url: String,
}

impl SourceConfig {
    /// Creates a source descriptor for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Rate feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Code of the currency every rate is expressed against.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Sources fetched on every table build.
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    /// Timeout applied to each fetch individually, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum number of fetches in flight.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// Lifetime of a cached rate table in seconds. `0` disables caching.
    #[serde(default)]
    pub cache_ttl_secs: u64,
    /// User agent sent to the feeds.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            sources: default_sources(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            cache_ttl_secs: 0,
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_currency() -> String {
    "NIS".to_string()
}

fn default_sources() -> Vec<SourceConfig> {
    DEFAULT_SOURCE_URLS.iter().map(|url| SourceConfig::new(*url)).collect()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_concurrent_fetches() -> usize {
    5
}

fn default_user_agent() -> String {
    format!("xrate/{}", env!("CARGO_PKG_VERSION"))
}

impl FeedConfig {
    /// Per-fetch timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Table cache lifetime, `None` when caching is off.
    #[must_use]
    pub const fn cache_ttl(&self) -> Option<Duration> {
        if self.cache_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.cache_ttl_secs))
        }
    }

    /// URLs of all configured sources, in configured order.
    #[must_use]
    pub fn source_urls(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.url.clone()).collect()
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("XRATE").separator("__"))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot run.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` describing the first invalid value.
    pub fn validate(&self) -> AppResult<()> {
        let feed = &self.feed;
        if feed.base_currency.trim().is_empty() {
            return Err(AppError::Config("feed.base_currency is empty".into()));
        }
        if feed.timeout_secs == 0 {
            return Err(AppError::Config("feed.timeout_secs must be positive".into()));
        }
        if feed.max_concurrent_fetches == 0 {
            return Err(AppError::Config(
                "feed.max_concurrent_fetches must be positive".into(),
            ));
        }
        if let Some(index) = feed.sources.iter().position(|s| s.url.trim().is_empty()) {
            return Err(AppError::Config(format!("feed.sources[{index}].url is empty")));
        }
        Ok(())
    }
}
