//! Application configuration.
//!
//! The configuration is loaded from a JSON file at
//! `$XDG_CONFIG_HOME/winshift/config.json`.  Each concern lives under its
//! own top-level key so new sections can be added without breaking older
//! files.
//!
//! # Example
//!
//! ```json
//! {
//!   "keys": {
//!     "hyper": ["cmd", "ctrl", "alt"],
//!     "hyper_shift": ["cmd", "ctrl", "alt", "shift"]
//!   },
//!   "search": {
//!     "prompt": "Search: ",
//!     "filter_debounce_ms": 50,
//!     "refocus_retry_ms": 200
//!   },
//!   "info": { "duration_secs": 10, "weight": 16.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Modifier tiers used by the [`Keymap`](crate::keymap::Keymap).
    #[serde(default)]
    pub keys: KeyConfig,

    /// Incremental window search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Window-info modal settings.
    #[serde(default)]
    pub info: InfoConfig,
}

/// The two modifier tiers.  Modifier names are matched case-insensitively
/// and in any order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Tier that tiles windows.  Default: `["cmd", "ctrl", "alt"]`.
    pub hyper: Vec<String>,
    /// Tier that shifts windows.  Default: hyper plus `"shift"`.
    pub hyper_shift: Vec<String>,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            hyper: vec!["cmd".into(), "ctrl".into(), "alt".into()],
            hyper_shift: vec!["cmd".into(), "ctrl".into(), "alt".into(), "shift".into()],
        }
    }
}

/// Incremental search settings.
///
/// Durations are in **milliseconds**.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Text shown in front of the filter.  Default: `"Search: "`.
    pub prompt: String,
    /// Quiet period before a burst of filter changes is applied.  `0`
    /// applies every change immediately.  Default: `0`.
    pub filter_debounce_ms: u64,
    /// Delay of the second refocus attempt when a search is abandoned.
    /// Default: `200`.
    pub refocus_retry_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            prompt: "Search: ".into(),
            filter_debounce_ms: 0,
            refocus_retry_ms: 200,
        }
    }
}

impl SearchConfig {
    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    pub fn refocus_retry(&self) -> Duration {
        Duration::from_millis(self.refocus_retry_ms)
    }
}

/// Window-info modal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoConfig {
    /// How long the modal stays up.  Default: `10`.
    pub duration_secs: u64,
    /// Font weight hint for the modal text.  Default: `16.0`.
    pub weight: f64,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            duration_secs: 10,
            weight: 16.0,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
