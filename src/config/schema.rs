//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the route matcher.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Build output directory; manifests are read from `<dist_dir>/server`.
    pub dist_dir: PathBuf,

    /// Which route sources to load.
    pub providers: ProvidersConfig,

    /// Locale routing. Absent disables locale handling.
    pub i18n: Option<I18nConfig>,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Manifest watching for the `watch` command.
    pub watch: WatchConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from(".next"),
            providers: ProvidersConfig::default(),
            i18n: None,
            observability: ObservabilityConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

/// Route sources.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    /// `page` entries of the app paths manifest.
    pub app_pages: bool,

    /// `route` entries of the app paths manifest.
    pub app_routes: bool,

    /// Entries of the pages manifest.
    pub pages: bool,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            app_pages: true,
            app_routes: true,
            pages: true,
        }
    }
}

/// Locale routing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct I18nConfig {
    /// Supported locales, e.g. `["en", "fr"]`.
    pub locales: Vec<String>,

    /// Locale assumed when a pathname carries none.
    pub default_locale: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter
    /// directive. `RUST_LOG` takes precedence.
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Full,
        }
    }
}

/// Manifest watching.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WatchConfig {
    /// Reload when manifests change.
    pub enabled: bool,

    /// Poll interval for backends that fall back to polling.
    pub poll_interval_secs: u64,

    /// Quiet period after a change before reloading.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 2,
            debounce_ms: 100,
        }
    }
}
