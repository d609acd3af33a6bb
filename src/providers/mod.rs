//! Route providers.
//!
//! # Data Flow
//! ```text
//! Build output (<dist_dir>/server/*.json)
//!     → manifest.rs (ManifestLoader: file or memory)
//!     → cached.rs (reuse matchers while the manifest is unchanged)
//!     → app_page.rs / app_route.rs / pages.rs (manifest → matchers)
//!     → RouteMatcherManager::force_reload
//! ```
//!
//! # Design Decisions
//! - A provider is anything that can list matchers asynchronously
//! - Providers return shared matchers so an unchanged manifest yields the
//!   same `Arc`s and the manager can skip re-sorting
//! - One bad page fails the whole provider; the manager keeps the last
//!   good snapshot

pub mod app_page;
pub mod app_route;
pub mod cached;
pub mod manifest;
pub mod pages;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::RouterConfig;
use crate::routing::definition::RouteDefinition;
use crate::routing::i18n::{I18nProvider, LocaleNormalizer};
use crate::routing::matcher::{matcher_for, SharedMatcher};
use crate::routing::options::{DefaultNormalizer, Normalizer};
use crate::routing::pathname::PatternError;

pub use app_page::AppPageTransformer;
pub use app_route::AppRouteTransformer;
pub use cached::{CachedManifestProvider, ManifestTransformer};
pub use manifest::{FileManifestLoader, Manifest, ManifestLoader, MemoryManifestLoader};
pub use pages::PagesTransformer;

/// Errors raised while listing matchers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read manifest {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid route for page {page}: {source}")]
    Pattern {
        page: String,
        #[source]
        source: PatternError,
    },

    #[error("{0}")]
    Other(String),
}

/// Source of route matchers.
#[async_trait]
pub trait RouteMatcherProvider: Send + Sync {
    /// List every matcher this provider contributes, in precedence order.
    async fn matchers(&self) -> Result<Vec<SharedMatcher>, ProviderError>;
}

/// Provider over a fixed set of definitions, compiled once.
#[derive(Debug, Clone, Default)]
pub struct DefinitionProvider {
    matchers: Vec<SharedMatcher>,
}

impl DefinitionProvider {
    pub fn new(
        definitions: impl IntoIterator<Item = RouteDefinition>,
    ) -> Result<Self, ProviderError> {
        let matchers = definitions
            .into_iter()
            .map(|definition| {
                let page = definition.page.clone();
                matcher_for(definition).map_err(|source| ProviderError::Pattern { page, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    pub fn from_matchers(matchers: Vec<SharedMatcher>) -> Self {
        Self { matchers }
    }
}

#[async_trait]
impl RouteMatcherProvider for DefinitionProvider {
    async fn matchers(&self) -> Result<Vec<SharedMatcher>, ProviderError> {
        Ok(self.matchers.clone())
    }
}

/// Providers and normalizer derived from configuration.
pub struct ProviderSet {
    pub providers: Vec<Arc<dyn RouteMatcherProvider>>,
    pub normalizer: Arc<dyn Normalizer>,
}

/// Build the manifest-backed providers enabled in `config`, reading from
/// `<dist_dir>/server`.
pub fn from_config(config: &RouterConfig) -> ProviderSet {
    let loader: Arc<dyn ManifestLoader> = Arc::new(FileManifestLoader::new(server_dir(config)));
    from_config_with_loader(config, loader)
}

/// Same as [`from_config`] with a caller-supplied manifest source.
pub fn from_config_with_loader(
    config: &RouterConfig,
    loader: Arc<dyn ManifestLoader>,
) -> ProviderSet {
    let i18n = config.i18n.as_ref().map(I18nProvider::new);
    let mut providers: Vec<Arc<dyn RouteMatcherProvider>> = Vec::new();

    if config.providers.app_pages {
        providers.push(Arc::new(CachedManifestProvider::new(
            Arc::clone(&loader),
            AppPageTransformer,
        )));
    }
    if config.providers.app_routes {
        providers.push(Arc::new(CachedManifestProvider::new(
            Arc::clone(&loader),
            AppRouteTransformer,
        )));
    }
    if config.providers.pages {
        providers.push(Arc::new(CachedManifestProvider::new(
            Arc::clone(&loader),
            PagesTransformer::new(i18n.clone()),
        )));
    }

    let normalizer: Arc<dyn Normalizer> = match i18n {
        Some(i18n) => Arc::new(LocaleNormalizer::new(i18n)),
        None => Arc::new(DefaultNormalizer),
    };

    tracing::debug!(providers = providers.len(), "Providers configured");
    ProviderSet {
        providers,
        normalizer,
    }
}

/// Directory holding the route manifests.
pub fn server_dir(config: &RouterConfig) -> PathBuf {
    config.dist_dir.join("server")
}
