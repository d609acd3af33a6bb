//! Locale analysis.
//!
//! # Responsibilities
//! - Detect a leading locale segment in a pathname
//! - Fall back to the default locale, flagging it as inferred
//! - Fill in locale context for queries that arrive without one
//!
//! # Design Decisions
//! - Locale comparison is ASCII case-insensitive; the configured casing wins
//! - Only the first segment is inspected

use crate::config::I18nConfig;
use crate::routing::options::{
    DefaultNormalizer, LocaleContext, MatchOptions, NormalizedMatchOptions, Normalizer,
};

/// Result of analyzing a pathname for a locale prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleAnalysis {
    /// Locale found in the pathname, or the default when inferred.
    pub detected_locale: Option<String>,
    /// Pathname with the locale prefix removed.
    pub pathname: String,
    /// True when `detected_locale` came from the default.
    pub inferred_from_default: bool,
}

impl LocaleAnalysis {
    /// Convert into query locale context; `None` when no locale applies.
    pub fn into_context(self) -> Option<LocaleContext> {
        let locale = self.detected_locale?;
        Some(LocaleContext {
            locale,
            inferred_from_default: self.inferred_from_default,
            pathname: self.pathname,
        })
    }
}

/// Locale detection over a fixed locale list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nProvider {
    locales: Vec<String>,
    default_locale: String,
}

impl I18nProvider {
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            locales: config.locales.clone(),
            default_locale: config.default_locale.clone(),
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Analyze `pathname`, falling back to `default_locale` when no prefix
    /// is present.
    pub fn analyze(&self, pathname: &str, default_locale: Option<&str>) -> LocaleAnalysis {
        let first = pathname
            .strip_prefix('/')
            .and_then(|rest| rest.split('/').next())
            .unwrap_or_default();

        if let Some(locale) = self
            .locales
            .iter()
            .find(|locale| !first.is_empty() && locale.eq_ignore_ascii_case(first))
        {
            let rest = &pathname[1 + first.len()..];
            return LocaleAnalysis {
                detected_locale: Some(locale.clone()),
                pathname: if rest.is_empty() {
                    "/".to_string()
                } else {
                    rest.to_string()
                },
                inferred_from_default: false,
            };
        }

        LocaleAnalysis {
            detected_locale: default_locale.map(str::to_string),
            pathname: pathname.to_string(),
            inferred_from_default: default_locale.is_some(),
        }
    }

    /// Explicit locale context for `pathname`. A leading segment naming
    /// `locale` is removed; any other pathname is kept as given.
    pub fn context_for(&self, locale: &str, pathname: &str) -> LocaleContext {
        let analysis = self.analyze(pathname, None);
        let pathname = match analysis.detected_locale {
            Some(detected) if detected.eq_ignore_ascii_case(locale) => analysis.pathname,
            _ => pathname.to_string(),
        };
        LocaleContext {
            locale: locale.to_string(),
            inferred_from_default: false,
            pathname,
        }
    }
}

/// Normalizer that resolves locale context when the caller supplied none.
#[derive(Debug, Clone)]
pub struct LocaleNormalizer {
    i18n: I18nProvider,
}

impl LocaleNormalizer {
    pub fn new(i18n: I18nProvider) -> Self {
        Self { i18n }
    }
}

impl Normalizer for LocaleNormalizer {
    fn normalize(&self, pathname: &str, options: &MatchOptions) -> NormalizedMatchOptions {
        let mut normalized = DefaultNormalizer.normalize(pathname, options);
        if normalized.locale.is_none() {
            normalized.locale = self
                .i18n
                .analyze(&normalized.pathname, Some(self.i18n.default_locale()))
                .into_context();
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> I18nProvider {
        I18nProvider::new(&I18nConfig {
            locales: vec!["en".into(), "fr".into(), "pt-BR".into()],
            default_locale: "en".into(),
        })
    }

    #[test]
    fn test_detects_locale_prefix() {
        let analysis = provider().analyze("/fr/about", None);
        assert_eq!(analysis.detected_locale.as_deref(), Some("fr"));
        assert_eq!(analysis.pathname, "/about");
        assert!(!analysis.inferred_from_default);
    }

    #[test]
    fn test_locale_root() {
        let analysis = provider().analyze("/fr", None);
        assert_eq!(analysis.pathname, "/");
        assert_eq!(analysis.detected_locale.as_deref(), Some("fr"));
    }

    #[test]
    fn test_case_insensitive_detection() {
        let analysis = provider().analyze("/pt-br/docs", None);
        assert_eq!(analysis.detected_locale.as_deref(), Some("pt-BR"));
        assert_eq!(analysis.pathname, "/docs");
    }

    #[test]
    fn test_default_locale_inferred() {
        let analysis = provider().analyze("/about", Some("en"));
        assert_eq!(analysis.detected_locale.as_deref(), Some("en"));
        assert_eq!(analysis.pathname, "/about");
        assert!(analysis.inferred_from_default);

        let analysis = provider().analyze("/about", None);
        assert!(analysis.into_context().is_none());
    }

    #[test]
    fn test_partial_prefix_is_not_a_locale() {
        let analysis = provider().analyze("/french/about", None);
        assert_eq!(analysis.detected_locale, None);
        assert_eq!(analysis.pathname, "/french/about");
    }

    #[test]
    fn test_context_for_strips_matching_prefix() {
        let context = provider().context_for("fr", "/fr/about");
        assert_eq!(context.locale, "fr");
        assert_eq!(context.pathname, "/about");
        assert!(!context.inferred_from_default);

        assert_eq!(provider().context_for("fr", "/about").pathname, "/about");
        // A different locale's prefix belongs to the pathname.
        assert_eq!(provider().context_for("fr", "/en/about").pathname, "/en/about");
    }

    #[test]
    fn test_locale_normalizer_fills_context() {
        let normalizer = LocaleNormalizer::new(provider());

        let normalized = normalizer.normalize("/fr/about/", &MatchOptions::default());
        assert_eq!(normalized.pathname, "/fr/about");
        let context = normalized.locale.unwrap();
        assert_eq!(context.locale, "fr");
        assert_eq!(context.pathname, "/about");

        let normalized = normalizer.normalize("/about", &MatchOptions::default());
        let context = normalized.locale.unwrap();
        assert_eq!(context.locale, "en");
        assert!(context.inferred_from_default);
    }

    #[test]
    fn test_locale_normalizer_respects_caller_context() {
        let normalizer = LocaleNormalizer::new(provider());
        let supplied = LocaleContext {
            locale: "fr".into(),
            inferred_from_default: false,
            pathname: "/x".into(),
        };
        let options = MatchOptions::default().with_locale(supplied.clone());
        assert_eq!(normalizer.normalize("/y", &options).locale, Some(supplied));
    }
}
