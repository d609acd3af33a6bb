//! Route definitions.
//!
//! A definition is the immutable description of one logical route as a
//! provider discovered it. Matchers wrap definitions; nothing mutates them.

use serde::{Deserialize, Serialize};

/// Where a route came from and what it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteKind {
    /// A page under `pages/`.
    Pages,
    /// An API handler under `pages/api/`.
    PagesApi,
    /// A `page` file under `app/`.
    AppPage,
    /// A `route` handler under `app/`.
    AppRoute,
}

/// Locale information attached to locale-aware definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLocale {
    /// The locale this definition serves. `None` serves every locale.
    pub locale: Option<String>,
}

/// Immutable descriptor of one logical route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub kind: RouteKind,

    /// Normalized route path; may contain dynamic segments.
    pub pathname: String,

    /// The page identifier selected for this route.
    pub page: String,

    /// Bundle path relative to the server output directory.
    pub bundle_path: String,

    /// File backing the selected page.
    pub filename: String,

    /// Every raw declaration collapsed into `pathname` (at least `page`).
    pub app_paths: Vec<String>,

    /// Present when the route is locale-aware.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<RouteLocale>,
}

impl RouteDefinition {
    /// Create a locale-naive definition whose only declaration is `page`.
    pub fn new(
        kind: RouteKind,
        pathname: impl Into<String>,
        page: impl Into<String>,
        bundle_path: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        let page = page.into();
        Self {
            kind,
            pathname: pathname.into(),
            app_paths: vec![page.clone()],
            page,
            bundle_path: bundle_path.into(),
            filename: filename.into(),
            i18n: None,
        }
    }

    /// Replace the collapsed declarations.
    pub fn with_app_paths(mut self, app_paths: Vec<String>) -> Self {
        self.app_paths = app_paths;
        self
    }

    /// Mark the definition locale-aware, optionally pinned to one locale.
    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.i18n = Some(RouteLocale { locale });
        self
    }

    pub fn is_locale_aware(&self) -> bool {
        self.i18n.is_some()
    }

    /// The locale this definition is pinned to, if any.
    pub fn locale(&self) -> Option<&str> {
        self.i18n.as_ref().and_then(|i18n| i18n.locale.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_definition_defaults() {
        let definition = RouteDefinition::new(
            RouteKind::Pages,
            "/about",
            "/about",
            "pages/about",
            "pages/about.js",
        );
        assert_eq!(definition.app_paths, vec!["/about".to_string()]);
        assert!(!definition.is_locale_aware());
        assert_eq!(definition.locale(), None);
    }

    #[test]
    fn test_locale_definition() {
        let definition = RouteDefinition::new(
            RouteKind::Pages,
            "/about",
            "/fr/about",
            "pages/fr/about",
            "pages/fr/about.js",
        )
        .with_locale(Some("fr".into()));
        assert!(definition.is_locale_aware());
        assert_eq!(definition.locale(), Some("fr"));
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&RouteKind::AppPage).unwrap();
        assert_eq!(json, "\"APP_PAGE\"");
    }
}
