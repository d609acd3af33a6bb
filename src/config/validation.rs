//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check locale settings are consistent
//! - Validate value ranges (poll interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RouterConfig;

/// One semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("i18n.locales must not be empty")]
    NoLocales,

    #[error("i18n.locales lists {0} more than once")]
    DuplicateLocale(String),

    #[error("i18n.default_locale {0} is not one of i18n.locales")]
    UnknownDefaultLocale(String),

    #[error("watch.poll_interval_secs must be greater than zero")]
    ZeroPollInterval,

    #[error("at least one provider must be enabled")]
    NoProviders,
}

/// Check a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(i18n) = &config.i18n {
        if i18n.locales.is_empty() {
            errors.push(ValidationError::NoLocales);
        }

        let mut seen = HashSet::new();
        for locale in &i18n.locales {
            if !seen.insert(locale.to_ascii_lowercase()) {
                errors.push(ValidationError::DuplicateLocale(locale.clone()));
            }
        }

        if !i18n
            .locales
            .iter()
            .any(|locale| locale.eq_ignore_ascii_case(&i18n.default_locale))
        {
            errors.push(ValidationError::UnknownDefaultLocale(
                i18n.default_locale.clone(),
            ));
        }
    }

    if config.watch.poll_interval_secs == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    let providers = &config.providers;
    if !(providers.app_pages || providers.app_routes || providers.pages) {
        errors.push(ValidationError::NoProviders);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::I18nConfig;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = RouterConfig::default();
        config.i18n = Some(I18nConfig {
            locales: vec!["en".into(), "EN".into()],
            default_locale: "de".into(),
        });
        config.watch.poll_interval_secs = 0;
        config.providers.app_pages = false;
        config.providers.app_routes = false;
        config.providers.pages = false;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateLocale("EN".into()),
                ValidationError::UnknownDefaultLocale("de".into()),
                ValidationError::ZeroPollInterval,
                ValidationError::NoProviders,
            ]
        );
    }

    #[test]
    fn test_empty_locales() {
        let mut config = RouterConfig::default();
        config.i18n = Some(I18nConfig {
            locales: vec![],
            default_locale: "en".into(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::NoLocales));
    }
}
