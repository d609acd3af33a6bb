//! Per-query match options and their normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Locale context for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleContext {
    /// The locale the request resolved to.
    pub locale: String,

    /// True when the client did not supply a locale and the configured
    /// default was synthesized.
    pub inferred_from_default: bool,

    /// The request pathname with any locale prefix removed.
    pub pathname: String,
}

/// Options supplied by the caller alongside a pathname.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Only match the route whose definition pathname is exactly this.
    pub matched_output_pathname: Option<String>,

    /// Locale context already resolved by the caller.
    pub locale: Option<LocaleContext>,
}

impl MatchOptions {
    pub fn with_output(mut self, pathname: impl Into<String>) -> Self {
        self.matched_output_pathname = Some(pathname.into());
        self
    }

    pub fn with_locale(mut self, locale: LocaleContext) -> Self {
        self.locale = Some(locale);
        self
    }
}

/// The shape matchers consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMatchOptions {
    pub pathname: String,
    pub matched_output_pathname: Option<String>,
    pub locale: Option<LocaleContext>,
}

/// Turns a raw `(pathname, options)` query into [`NormalizedMatchOptions`].
///
/// Implementations must be pure: identical input gives identical output.
pub trait Normalizer: Send + Sync + fmt::Debug {
    fn normalize(&self, pathname: &str, options: &MatchOptions) -> NormalizedMatchOptions;
}

/// Leading-slash and trailing-slash normalization only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNormalizer;

impl Normalizer for DefaultNormalizer {
    fn normalize(&self, pathname: &str, options: &MatchOptions) -> NormalizedMatchOptions {
        NormalizedMatchOptions {
            pathname: normalize_pathname(pathname),
            matched_output_pathname: options.matched_output_pathname.clone(),
            locale: options.locale.clone(),
        }
    }
}

/// Ensure a leading slash and drop a trailing one (except for the root).
pub fn normalize_pathname(pathname: &str) -> String {
    let mut normalized = if pathname.starts_with('/') {
        pathname.to_string()
    } else {
        format!("/{pathname}")
    };
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}
