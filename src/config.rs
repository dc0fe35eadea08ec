//! Configuration file loading with environment variable overrides.
//!
//! The host application normally supplies the account snapshot itself; the
//! CLI reads it from a TOML file instead and lets `EASEL_API_KEY` override
//! the stored key.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::account::AccountState;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Account link state as last synced by the host.
    #[serde(default)]
    pub account: AccountConfig,

    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// First-party backend settings.
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Default parameter values.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Account link state.
#[derive(Debug, Default, Deserialize)]
pub struct AccountConfig {
    /// Whether a first-party account is linked.
    #[serde(default)]
    pub linked: bool,
    /// Subscription tier as a cents-equivalent.
    #[serde(default)]
    pub tier_cents: u32,
    /// Whether to prefer server-side generation when the tier allows it.
    #[serde(default)]
    pub server_mode_preferred: bool,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Third-party provider API key.
    pub api_key: Option<String>,
}

/// First-party backend settings.
#[derive(Debug, Deserialize)]
pub struct BrokerConfig {
    /// Backend base URL.
    pub base_url: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self { base_url: "https://api.easel-portraits.app".to_string() }
    }
}

/// Default parameter values from the config file.
#[derive(Debug, Deserialize)]
pub struct DefaultsConfig {
    /// Default model name.
    pub model: String,
    /// Default aspect ratio.
    pub aspect_ratio: String,
    /// Default quality.
    pub quality: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "gpt-image-1".to_string(),
            aspect_ratio: "square".to_string(),
            quality: "medium".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the provider API key, preferring the environment variable.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var("EASEL_API_KEY").ok().or_else(|| self.keys.api_key.clone())
    }

    /// Assemble the read-only account snapshot for one request.
    #[must_use]
    pub fn account_state(&self) -> AccountState {
        AccountState {
            linked: self.account.linked,
            tier_cents: self.account.tier_cents,
            local_api_key: self.api_key(),
            server_mode_preferred: self.account.server_mode_preferred,
        }
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `EASEL_CONFIG` environment variable
/// 3. `~/.config/easel/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("EASEL_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/easel/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/easel/config.toml")
    } else {
        PathBuf::from("easel.toml")
    }
}
