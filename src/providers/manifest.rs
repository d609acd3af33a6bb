//! Manifest sources.
//!
//! # Responsibilities
//! - Read route manifests produced by the build
//! - Report a missing manifest as absent rather than as an error
//!
//! # Design Decisions
//! - Manifests are flat JSON objects of route id → bundle file
//! - Ordered maps so every consumer sees entries in one stable order

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::providers::ProviderError;

/// App router manifest: `/blog/[slug]/page` → `app/blog/[slug]/page.js`.
pub const APP_PATHS_MANIFEST: &str = "app-paths-manifest.json";

/// Pages router manifest: `/blog/[slug]` → `pages/blog/[slug].js`.
pub const PAGES_MANIFEST: &str = "pages-manifest.json";

/// Route id → bundle file.
pub type Manifest = BTreeMap<String, String>;

/// Source of manifests by file name.
#[async_trait]
pub trait ManifestLoader: Send + Sync {
    /// Load a manifest; `Ok(None)` when it does not exist.
    async fn load(&self, name: &str) -> Result<Option<Arc<Manifest>>, ProviderError>;
}

/// Reads manifests from a directory.
#[derive(Debug, Clone)]
pub struct FileManifestLoader {
    dir: PathBuf,
}

impl FileManifestLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ManifestLoader for FileManifestLoader {
    async fn load(&self, name: &str) -> Result<Option<Arc<Manifest>>, ProviderError> {
        let path = self.dir.join(name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = ?path, "Manifest not found");
                return Ok(None);
            }
            Err(source) => {
                return Err(ProviderError::Io {
                    name: name.to_string(),
                    source,
                })
            }
        };

        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|source| ProviderError::Parse {
                name: name.to_string(),
                source,
            })?;
        Ok(Some(Arc::new(manifest)))
    }
}

/// In-memory manifests, replaceable at runtime.
#[derive(Debug, Default)]
pub struct MemoryManifestLoader {
    manifests: RwLock<HashMap<String, Arc<Manifest>>>,
}

impl MemoryManifestLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>, manifest: Manifest) {
        self.manifests
            .write()
            .expect("manifest lock poisoned")
            .insert(name.into(), Arc::new(manifest));
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Manifest>> {
        self.manifests
            .write()
            .expect("manifest lock poisoned")
            .remove(name)
    }
}

#[async_trait]
impl ManifestLoader for MemoryManifestLoader {
    async fn load(&self, name: &str) -> Result<Option<Arc<Manifest>>, ProviderError> {
        Ok(self
            .manifests
            .read()
            .expect("manifest lock poisoned")
            .get(name)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_loader() {
        let loader = MemoryManifestLoader::new();
        assert!(loader.load(PAGES_MANIFEST).await.unwrap().is_none());

        let manifest = Manifest::from([("/".to_string(), "pages/index.js".to_string())]);
        loader.insert(PAGES_MANIFEST, manifest.clone());
        assert_eq!(
            loader.load(PAGES_MANIFEST).await.unwrap().as_deref(),
            Some(&manifest)
        );

        loader.remove(PAGES_MANIFEST);
        assert!(loader.load(PAGES_MANIFEST).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_loader_missing_dir() {
        let loader = FileManifestLoader::new("/nonexistent/route-matcher/server");
        assert!(loader.load(APP_PATHS_MANIFEST).await.unwrap().is_none());
    }
}
