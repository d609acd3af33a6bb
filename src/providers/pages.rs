//! Pages router (`pages/**`).
//!
//! # Responsibilities
//! - Map `pages-manifest.json` entries to `Pages` / `PagesApi` matchers
//! - Skip the framework's internal pages
//! - With i18n, pin each page to the locale its path starts with
//!
//! # Design Decisions
//! - With i18n every page is locale-aware, even without a locale prefix;
//!   such pages serve every locale

use crate::providers::cached::ManifestTransformer;
use crate::providers::manifest::{Manifest, PAGES_MANIFEST};
use crate::providers::ProviderError;
use crate::routing::definition::{RouteDefinition, RouteKind};
use crate::routing::i18n::I18nProvider;
use crate::routing::matcher::{matcher_for, SharedMatcher};

/// Pages that exist in the manifest but never serve a request directly.
const INTERNAL_PAGES: &[&str] = &["/_app", "/_document", "/_error"];

#[derive(Debug, Clone, Default)]
pub struct PagesTransformer {
    i18n: Option<I18nProvider>,
}

impl PagesTransformer {
    pub fn new(i18n: Option<I18nProvider>) -> Self {
        Self { i18n }
    }
}

impl ManifestTransformer for PagesTransformer {
    fn manifest_name(&self) -> &'static str {
        PAGES_MANIFEST
    }

    fn transform(&self, manifest: &Manifest) -> Result<Vec<SharedMatcher>, ProviderError> {
        let mut matchers = Vec::new();

        for (page, filename) in manifest {
            if INTERNAL_PAGES.contains(&page.as_str()) {
                continue;
            }

            let (pathname, locale) = match &self.i18n {
                Some(i18n) => {
                    let analysis = i18n.analyze(page, None);
                    (analysis.pathname, Some(analysis.detected_locale))
                }
                None => (page.clone(), None),
            };

            let mut definition = RouteDefinition::new(
                kind_for(&pathname),
                pathname,
                page.clone(),
                bundle_path(page),
                filename.clone(),
            );
            if let Some(locale) = locale {
                definition = definition.with_locale(locale);
            }

            let matcher = matcher_for(definition).map_err(|source| ProviderError::Pattern {
                page: page.clone(),
                source,
            })?;
            matchers.push(matcher);
        }

        Ok(matchers)
    }
}

fn kind_for(pathname: &str) -> RouteKind {
    if pathname == "/api" || pathname.starts_with("/api/") {
        RouteKind::PagesApi
    } else {
        RouteKind::Pages
    }
}

fn bundle_path(page: &str) -> String {
    if page == "/" {
        "pages/index".to_string()
    } else {
        format!("pages{page}")
    }
}
