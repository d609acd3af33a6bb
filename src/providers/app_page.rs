//! App router pages (`app/**/page`).
//!
//! Declarations that normalize to the same pathname (route groups, parallel
//! slots) collapse into one matcher whose definition lists all of them.

use crate::providers::cached::ManifestTransformer;
use crate::providers::manifest::{Manifest, APP_PATHS_MANIFEST};
use crate::providers::ProviderError;
use crate::routing::app_paths::{normalize_app_path, AppPathnames};
use crate::routing::definition::{RouteDefinition, RouteKind};
use crate::routing::matcher::{matcher_for, SharedMatcher};

#[derive(Debug, Clone, Copy, Default)]
pub struct AppPageTransformer;

impl ManifestTransformer for AppPageTransformer {
    fn manifest_name(&self) -> &'static str {
        APP_PATHS_MANIFEST
    }

    fn transform(&self, manifest: &Manifest) -> Result<Vec<SharedMatcher>, ProviderError> {
        let mut collector = AppPathnames::new();
        let mut discovered = Vec::new();

        for page in manifest.keys().filter(|page| page.ends_with("/page")) {
            let pathname = normalize_app_path(page);
            if collector.push(pathname.clone(), page.clone()) == 1 {
                discovered.push(pathname);
            }
        }

        let mut matchers = Vec::with_capacity(discovered.len());
        for pathname in discovered {
            let Some(aggregate) = collector.get(&pathname) else {
                continue;
            };
            let filename = manifest.get(&aggregate.page).cloned().unwrap_or_default();
            let definition = RouteDefinition::new(
                RouteKind::AppPage,
                aggregate.pathname,
                aggregate.page.clone(),
                format!("app{}", aggregate.page),
                filename,
            )
            .with_app_paths(aggregate.app_paths);

            let matcher = matcher_for(definition).map_err(|source| ProviderError::Pattern {
                page: aggregate.page,
                source,
            })?;
            matchers.push(matcher);
        }
        Ok(matchers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(entries: &[&str]) -> Manifest {
        entries
            .iter()
            .map(|page| (page.to_string(), format!("app{page}.js")))
            .collect()
    }

    #[test]
    fn test_groups_collapse_into_one_matcher() {
        let matchers = AppPageTransformer
            .transform(&manifest(&[
                "/(shop)/cart/page",
                "/@modal/cart/page",
                "/blog/[slug]/page",
                "/api/users/route",
            ]))
            .unwrap();

        assert_eq!(matchers.len(), 2);
        let cart = matchers
            .iter()
            .find(|m| m.definition().pathname == "/cart")
            .unwrap();
        let definition = cart.definition();
        assert_eq!(definition.kind, RouteKind::AppPage);
        assert_eq!(definition.page, "/@modal/cart/page");
        assert_eq!(definition.bundle_path, "app/@modal/cart/page");
        assert_eq!(definition.filename, "app/@modal/cart/page.js");
        assert_eq!(
            definition.app_paths,
            vec!["/(shop)/cart/page".to_string(), "/@modal/cart/page".to_string()]
        );
    }

    #[test]
    fn test_root_page() {
        let matchers = AppPageTransformer.transform(&manifest(&["/page"])).unwrap();
        assert_eq!(matchers[0].definition().pathname, "/");
        assert!(matchers[0].matches("/").is_some());
    }

    #[test]
    fn test_invalid_pattern_fails_transform() {
        let err = AppPageTransformer
            .transform(&manifest(&["/[...a]/b/page"]))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Pattern { .. }));
    }
}
