//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → providers::from_config builds providers and normalizer
//!
//! While watching:
//!     watcher.rs detects manifest change
//!     → reload trigger
//!     → RouteMatcherManager::force_reload
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    I18nConfig, LogFormat, ObservabilityConfig, ProvidersConfig, RouterConfig, WatchConfig,
};
pub use validation::ValidationError;
