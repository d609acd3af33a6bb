//! Route matching logic.
//!
//! # Responsibilities
//! - Wrap one route definition with its compiled pathname matcher
//! - Expose the identity key used for deduplication and sort stability
//! - Adapt queries to locale context (strip synthesized locale prefixes,
//!   enforce locale context for locale-aware routes)
//!
//! # Design Decisions
//! - Matchers are immutable and shared as `Arc<dyn RouteMatcher>`
//! - Identity is computed once at construction
//! - Locale-aware matchers treat a missing locale context as a contract
//!   violation rather than a silent no-match

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::routing::definition::RouteDefinition;
use crate::routing::error::RoutingError;
use crate::routing::options::NormalizedMatchOptions;
use crate::routing::pathname::{Params, PathnameMatcher, PatternError};

/// A matcher shared between providers, snapshots and query iterators.
pub type SharedMatcher = Arc<dyn RouteMatcher>;

/// A successful match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMatch {
    /// The matched route.
    pub definition: Arc<RouteDefinition>,
    /// Parameters extracted from the pathname.
    pub params: Params,
}

/// Trait for matching pathnames against one route definition.
pub trait RouteMatcher: Send + Sync + fmt::Debug {
    fn definition(&self) -> &Arc<RouteDefinition>;

    fn pathname_matcher(&self) -> &PathnameMatcher;

    /// Stable key; matchers with equal identity are duplicates.
    fn identity(&self) -> &str;

    fn is_dynamic(&self) -> bool {
        self.pathname_matcher().is_dynamic()
    }

    fn is_locale_aware(&self) -> bool {
        false
    }

    /// Match a bare pathname.
    fn matches(&self, pathname: &str) -> Option<RouteMatch> {
        self.pathname_matcher()
            .matches(pathname)
            .map(|params| RouteMatch {
                definition: Arc::clone(self.definition()),
                params,
            })
    }

    /// Match a normalized query.
    ///
    /// Locale-naive matchers see the locale-stripped pathname when the
    /// locale was inferred from the default, so they never observe a locale
    /// segment they did not declare.
    fn match_options(
        &self,
        options: &NormalizedMatchOptions,
    ) -> Result<Option<RouteMatch>, RoutingError> {
        let pathname = match &options.locale {
            Some(locale) if locale.inferred_from_default => &locale.pathname,
            _ => &options.pathname,
        };
        Ok(self.matches(pathname))
    }
}

/// Locale-naive matcher: identity is the definition pathname.
#[derive(Debug, Clone)]
pub struct PathnameRouteMatcher {
    definition: Arc<RouteDefinition>,
    matcher: PathnameMatcher,
}

impl PathnameRouteMatcher {
    pub fn new(definition: RouteDefinition) -> Result<Self, PatternError> {
        let matcher = PathnameMatcher::compile(&definition.pathname)?;
        Ok(Self {
            definition: Arc::new(definition),
            matcher,
        })
    }
}

impl RouteMatcher for PathnameRouteMatcher {
    fn definition(&self) -> &Arc<RouteDefinition> {
        &self.definition
    }

    fn pathname_matcher(&self) -> &PathnameMatcher {
        &self.matcher
    }

    fn identity(&self) -> &str {
        &self.definition.pathname
    }
}

/// Locale-aware matcher.
///
/// Requires locale context on every query. When the definition is pinned to
/// a locale, queries resolved to a different locale never match.
#[derive(Debug, Clone)]
pub struct LocaleRouteMatcher {
    inner: PathnameRouteMatcher,
    identity: String,
}

impl LocaleRouteMatcher {
    pub fn new(definition: RouteDefinition) -> Result<Self, PatternError> {
        let identity = match definition.locale() {
            Some(locale) => format!("{}?__locale={}", definition.pathname, locale),
            None => definition.pathname.clone(),
        };
        Ok(Self {
            inner: PathnameRouteMatcher::new(definition)?,
            identity,
        })
    }
}

impl RouteMatcher for LocaleRouteMatcher {
    fn definition(&self) -> &Arc<RouteDefinition> {
        self.inner.definition()
    }

    fn pathname_matcher(&self) -> &PathnameMatcher {
        self.inner.pathname_matcher()
    }

    fn identity(&self) -> &str {
        &self.identity
    }

    fn is_locale_aware(&self) -> bool {
        true
    }

    fn match_options(
        &self,
        options: &NormalizedMatchOptions,
    ) -> Result<Option<RouteMatch>, RoutingError> {
        let Some(context) = &options.locale else {
            return Err(RoutingError::LocaleContract {
                identity: self.identity.clone(),
            });
        };

        if let Some(expected) = self.definition().locale() {
            if !expected.eq_ignore_ascii_case(&context.locale) {
                return Ok(None);
            }
        }

        Ok(self.matches(&context.pathname))
    }
}

/// Build the matcher variant a definition calls for.
pub fn matcher_for(definition: RouteDefinition) -> Result<SharedMatcher, PatternError> {
    if definition.is_locale_aware() {
        Ok(Arc::new(LocaleRouteMatcher::new(definition)?))
    } else {
        Ok(Arc::new(PathnameRouteMatcher::new(definition)?))
    }
}
