//! App router route handlers (`app/**/route`).

use crate::providers::cached::ManifestTransformer;
use crate::providers::manifest::{Manifest, APP_PATHS_MANIFEST};
use crate::providers::ProviderError;
use crate::routing::app_paths::normalize_app_path;
use crate::routing::definition::{RouteDefinition, RouteKind};
use crate::routing::matcher::{matcher_for, SharedMatcher};

#[derive(Debug, Clone, Copy, Default)]
pub struct AppRouteTransformer;

impl ManifestTransformer for AppRouteTransformer {
    fn manifest_name(&self) -> &'static str {
        APP_PATHS_MANIFEST
    }

    fn transform(&self, manifest: &Manifest) -> Result<Vec<SharedMatcher>, ProviderError> {
        manifest
            .iter()
            .filter(|(page, _)| page.ends_with("/route"))
            .map(|(page, filename)| {
                let definition = RouteDefinition::new(
                    RouteKind::AppRoute,
                    normalize_app_path(page),
                    page.clone(),
                    format!("app{page}"),
                    filename.clone(),
                );
                matcher_for(definition).map_err(|source| ProviderError::Pattern {
                    page: page.clone(),
                    source,
                })
            })
            .collect()
    }
}
