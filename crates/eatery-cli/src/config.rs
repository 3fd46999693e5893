//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Duration;
use eatery_core::Location;
use eatery_net::{DEFAULT_API_URL, DEFAULT_MAX_SESSION_STALENESS_SECS, RetryPolicy};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the JSON file of eateries.
    pub eateries_path: PathBuf,

    /// IDs of the user's favorite eateries.
    #[serde(default)]
    pub favorites: Vec<String>,

    /// Where the user is, for walk-time estimates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(default)]
    pub account: AccountConfig,
}

/// Settings for the dining account service.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Seconds a session ID is reused before re-authenticating.
    pub max_session_staleness_secs: i64,

    /// Extra attempts after a request fails.
    pub retry_budget: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("eateries_path", &self.eateries_path)
            .field("favorites", &self.favorites)
            .field("location", &self.location)
            .field("account", &self.account)
            .finish()
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("api_url", &self.api_url)
            .field("pin", &self.pin.as_ref().map(|_| "[REDACTED]"))
            .field("device_id", &self.device_id)
            .field(
                "max_session_staleness_secs",
                &self.max_session_staleness_secs,
            )
            .field("retry_budget", &self.retry_budget)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            eateries_path: data_dir.join("eateries.json"),
            favorites: Vec::new(),
            location: None,
            account: AccountConfig::default(),
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            pin: None,
            device_id: None,
            max_session_staleness_secs: DEFAULT_MAX_SESSION_STALENESS_SECS,
            retry_budget: RetryPolicy::default().retry_budget,
        }
    }
}

impl AccountConfig {
    pub fn max_session_staleness(&self) -> Duration {
        Duration::seconds(self.max_session_staleness_secs)
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_budget)
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources override earlier ones: defaults, the platform config
    /// file, `config_path`, then `EATERY_*` environment variables. Nested
    /// keys use a double underscore, e.g. `EATERY_ACCOUNT__PIN`.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("EATERY_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for eatery.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("eatery"))
}

/// Returns the platform-specific data directory for eatery.
///
/// On Linux: `~/.local/share/eatery`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("eatery"))
}
