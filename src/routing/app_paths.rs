//! App-path aggregation.
//!
//! Several declarations under `app/` can normalize to one pathname: route
//! groups (`/(shop)/cart/page`) and parallel slots (`/@modal/cart/page`).
//! The collector gathers them per pathname and selects one page
//! deterministically, so the persisted manifest built from it diffs cleanly
//! across incremental rebuilds.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// All declarations for one pathname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppPathAggregate {
    pub pathname: String,
    /// The lexicographically greatest entry of `app_paths`.
    pub page: String,
    /// Sorted, de-duplicated declarations.
    pub app_paths: Vec<String>,
}

/// Collects `(pathname, page)` pairs.
#[derive(Debug, Clone, Default)]
pub struct AppPathnames {
    entries: HashMap<String, Vec<String>>,
}

impl AppPathnames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration; returns how many have been pushed for
    /// `pathname` so far (`1` the first time a pathname is seen).
    pub fn push(&mut self, pathname: impl Into<String>, page: impl Into<String>) -> usize {
        let pages = self.entries.entry(pathname.into()).or_default();
        pages.push(page.into());
        pages.len()
    }

    pub fn get(&self, pathname: &str) -> Option<AppPathAggregate> {
        self.entries
            .get(pathname)
            .and_then(|pages| aggregate(pathname, pages))
    }

    /// Aggregates ordered by pathname.
    pub fn to_sorted_vec(&self) -> Vec<AppPathAggregate> {
        let mut pathnames: Vec<&String> = self.entries.keys().collect();
        pathnames.sort();
        pathnames
            .into_iter()
            .filter_map(|pathname| self.get(pathname))
            .collect()
    }

    /// Object form for the persisted manifest: selected page to every
    /// declaration it stands for.
    pub fn to_manifest(&self) -> BTreeMap<String, Vec<String>> {
        self.to_sorted_vec()
            .into_iter()
            .map(|aggregate| (aggregate.page, aggregate.app_paths))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn aggregate(pathname: &str, pages: &[String]) -> Option<AppPathAggregate> {
    let mut app_paths = pages.to_vec();
    app_paths.sort();
    app_paths.dedup();
    let page = app_paths.last()?.clone();
    Some(AppPathAggregate {
        pathname: pathname.to_string(),
        page,
        app_paths,
    })
}

/// Normalize an app declaration (`/(group)/blog/@slot/[slug]/page`) to the
/// pathname it serves (`/blog/[slug]`).
pub fn normalize_app_path(route: &str) -> String {
    let segments: Vec<&str> = route.split('/').collect();
    let last = segments.len().saturating_sub(1);

    let mut pathname = String::new();
    for (index, segment) in segments.iter().enumerate() {
        if segment.is_empty()
            || is_group_segment(segment)
            || segment.starts_with('@')
            || (index == last && (*segment == "page" || *segment == "route"))
        {
            continue;
        }
        pathname.push('/');
        pathname.push_str(segment);
    }

    if pathname.is_empty() {
        pathname.push('/');
    }
    pathname
}

fn is_group_segment(segment: &str) -> bool {
    segment.starts_with('(') && segment.ends_with(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_counts() {
        let mut collector = AppPathnames::new();
        assert_eq!(collector.push("/cart", "/(shop)/cart/page"), 1);
        assert_eq!(collector.push("/cart", "/@modal/cart/page"), 2);
        assert_eq!(collector.push("/about", "/about/page"), 1);
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_selection_independent_of_push_order() {
        let mut forward = AppPathnames::new();
        forward.push("/p", "b");
        forward.push("/p", "a");

        let mut backward = AppPathnames::new();
        backward.push("/p", "a");
        backward.push("/p", "b");

        for collector in [&forward, &backward] {
            let aggregate = collector.get("/p").unwrap();
            assert_eq!(aggregate.page, "b");
            assert_eq!(aggregate.app_paths, vec!["a".to_string(), "b".to_string()]);
        }
        assert_eq!(
            serde_json::to_string(&forward.to_sorted_vec()).unwrap(),
            serde_json::to_string(&backward.to_sorted_vec()).unwrap()
        );
    }

    #[test]
    fn test_sorted_output_and_manifest() {
        let mut collector = AppPathnames::new();
        collector.push("/z", "/z/page");
        collector.push("/a", "/(x)/a/page");
        collector.push("/a", "/(y)/a/page");
        collector.push("/a", "/(y)/a/page");

        let sorted = collector.to_sorted_vec();
        let pathnames: Vec<&str> = sorted.iter().map(|a| a.pathname.as_str()).collect();
        assert_eq!(pathnames, vec!["/a", "/z"]);
        assert_eq!(sorted[0].app_paths.len(), 2);

        let manifest = collector.to_manifest();
        assert_eq!(
            manifest.get("/(y)/a/page"),
            Some(&vec!["/(x)/a/page".to_string(), "/(y)/a/page".to_string()])
        );
        assert!(manifest.contains_key("/z/page"));
    }

    #[test]
    fn test_missing_pathname() {
        assert!(AppPathnames::new().get("/nope").is_none());
        assert!(AppPathnames::new().is_empty());
    }

    #[test]
    fn test_normalize_app_path() {
        assert_eq!(normalize_app_path("/page"), "/");
        assert_eq!(normalize_app_path("/about/page"), "/about");
        assert_eq!(normalize_app_path("/(marketing)/about/page"), "/about");
        assert_eq!(normalize_app_path("/blog/@modal/[slug]/page"), "/blog/[slug]");
        assert_eq!(normalize_app_path("/api/users/route"), "/api/users");
        assert_eq!(normalize_app_path("/docs/page/view/page"), "/docs/page/view");
        assert_eq!(normalize_app_path("/(group)/page"), "/");
    }
}
