//! Manifest-backed provider with result caching.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::providers::manifest::{Manifest, ManifestLoader};
use crate::providers::{ProviderError, RouteMatcherProvider};
use crate::routing::matcher::SharedMatcher;

/// Turns one manifest into matchers.
pub trait ManifestTransformer: Send + Sync {
    /// File name of the manifest this transformer reads.
    fn manifest_name(&self) -> &'static str;

    fn transform(&self, manifest: &Manifest) -> Result<Vec<SharedMatcher>, ProviderError>;
}

/// Loads a manifest and rebuilds matchers only when its content changes.
///
/// Returning the cached `Arc`s for an unchanged manifest lets the manager
/// reuse its compiled order.
pub struct CachedManifestProvider<T> {
    loader: Arc<dyn ManifestLoader>,
    transformer: T,
    cache: Mutex<Option<(Arc<Manifest>, Vec<SharedMatcher>)>>,
}

impl<T: ManifestTransformer> CachedManifestProvider<T> {
    pub fn new(loader: Arc<dyn ManifestLoader>, transformer: T) -> Self {
        Self {
            loader,
            transformer,
            cache: Mutex::new(None),
        }
    }

    fn cached(&self, manifest: &Arc<Manifest>) -> Option<Vec<SharedMatcher>> {
        let cache = self.cache.lock().expect("provider cache lock poisoned");
        cache
            .as_ref()
            .filter(|(previous, _)| Arc::ptr_eq(previous, manifest) || **previous == **manifest)
            .map(|(_, matchers)| matchers.clone())
    }
}

impl<T> fmt::Debug for CachedManifestProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedManifestProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: ManifestTransformer> RouteMatcherProvider for CachedManifestProvider<T> {
    async fn matchers(&self) -> Result<Vec<SharedMatcher>, ProviderError> {
        let name = self.transformer.manifest_name();
        let Some(manifest) = self.loader.load(name).await? else {
            *self.cache.lock().expect("provider cache lock poisoned") = None;
            return Ok(Vec::new());
        };

        if let Some(matchers) = self.cached(&manifest) {
            tracing::trace!(manifest = name, "Manifest unchanged");
            return Ok(matchers);
        }

        let matchers = self.transformer.transform(&manifest)?;
        tracing::debug!(manifest = name, matchers = matchers.len(), "Manifest transformed");
        *self.cache.lock().expect("provider cache lock poisoned") =
            Some((manifest, matchers.clone()));
        Ok(matchers)
    }
}
