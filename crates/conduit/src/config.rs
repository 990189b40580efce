//! Configuration management for conduit.
//!
//! Configuration is loaded with figment from defaults, an optional TOML
//! file and `CONDUIT_`-prefixed environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "conduit";

/// Number of articles per feed page.
pub const ARTICLES_LIMIT_COUNT: u32 = 20;

/// Largest page size the API accepts.
const MAX_ARTICLES_LIMIT: u32 = 100;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CONDUIT_`, sections split on `__`)
/// 2. TOML config file at `~/.config/conduit/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API configuration.
    pub api: ApiConfig,
    /// Feed configuration.
    pub feed: FeedConfig,
}

/// Remote API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the RealWorld-compatible API, without a trailing slash.
    pub base_url: String,
    /// JWT used for authenticated requests.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Feed configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Articles requested per page.
    pub articles_limit: u32,
    /// How long a cached list result stays fresh, in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.realworld.io/api".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            articles_limit: ARTICLES_LIMIT_COUNT,
            cache_ttl_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CONDUIT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.feed.articles_limit == 0 || self.feed.articles_limit > MAX_ARTICLES_LIMIT {
            return Err(Error::config_validation(format!(
                "articles_limit must be between 1 and {MAX_ARTICLES_LIMIT}, got {}",
                self.feed.articles_limit
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::config_validation(
                "timeout_secs must be greater than 0",
            ));
        }

        match Url::parse(&self.api.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(Error::config_validation(format!(
                    "base_url is not an http(s) URL: {}",
                    self.api.base_url
                )));
            }
        }

        Ok(())
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Get the cache TTL as a Duration.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.feed.cache_ttl_secs)
    }
}
