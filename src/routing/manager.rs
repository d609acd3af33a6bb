//! Route matcher manager.
//!
//! # Responsibilities
//! - Own the registered providers and the current compiled snapshot
//! - Rebuild the snapshot from every provider on reload
//! - Answer match queries against the snapshot without blocking
//!
//! # Design Decisions
//! - Reloads are not serialized; a version counter bumped on every `push`
//!   detects registrations that race a reload, and the racing reload fails
//! - Queries refuse to run while the counter is ahead of the last compiled
//!   version instead of matching against stale routes
//! - The version check and the snapshot swap happen under the providers
//!   read lock, so a `push` cannot slip between them
//! - The snapshot is swapped atomically; readers never see a partial one
//! - `wait_till_ready` watches a count of in-flight reloads

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use arc_swap::ArcSwap;
use futures_util::future::try_join_all;
use tokio::sync::watch;

use crate::observability::metrics;
use crate::providers::RouteMatcherProvider;
use crate::routing::error::{RoutingError, RoutingResult};
use crate::routing::matcher::{RouteMatch, SharedMatcher};
use crate::routing::matches::RouteMatches;
use crate::routing::options::{DefaultNormalizer, MatchOptions, Normalizer};
use crate::routing::snapshot::CompiledSnapshot;

/// Lifecycle of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// No snapshot has ever compiled.
    Unloaded,
    /// A reload is in flight.
    Compiling,
    /// A snapshot is available and no reload is in flight.
    Ready,
}

/// Compiles matchers from providers and answers match queries.
pub struct RouteMatcherManager {
    providers: RwLock<Vec<Arc<dyn RouteMatcherProvider>>>,
    normalizer: Arc<dyn Normalizer>,
    snapshot: ArcSwap<CompiledSnapshot>,
    /// Bumped on every `push`.
    compilation_id: AtomicU64,
    /// Version of the snapshot currently published.
    last_compilation_id: AtomicU64,
    has_compiled: AtomicBool,
    loaded: AtomicBool,
    in_flight: watch::Sender<usize>,
}

impl RouteMatcherManager {
    pub fn new() -> Self {
        Self::with_normalizer(Arc::new(DefaultNormalizer))
    }

    pub fn with_normalizer(normalizer: Arc<dyn Normalizer>) -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            providers: RwLock::new(Vec::new()),
            normalizer,
            snapshot: ArcSwap::from_pointee(CompiledSnapshot::default()),
            compilation_id: AtomicU64::new(0),
            last_compilation_id: AtomicU64::new(0),
            has_compiled: AtomicBool::new(false),
            loaded: AtomicBool::new(false),
            in_flight,
        }
    }

    /// Register providers. Takes effect on the next reload; queries fail
    /// until then.
    pub fn push(&self, providers: impl IntoIterator<Item = Arc<dyn RouteMatcherProvider>>) {
        let mut registered = self.providers.write().expect("providers lock poisoned");
        let before = registered.len();
        registered.extend(providers);
        let version = self.compilation_id.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            added = registered.len() - before,
            total = registered.len(),
            version,
            "Providers registered"
        );
    }

    /// Reload once over the manager's lifetime. Later calls only wait for
    /// an in-flight reload.
    pub async fn load(&self) -> RoutingResult<()> {
        if self.loaded.swap(true, Ordering::SeqCst) {
            self.wait_till_ready().await;
            return Ok(());
        }
        self.force_reload().await
    }

    /// Fetch every provider's matchers and publish a new snapshot.
    ///
    /// Fails with [`RoutingError::InvariantViolation`] when a provider was
    /// registered while the reload ran; the previous snapshot stays.
    pub async fn force_reload(&self) -> RoutingResult<()> {
        let version = self.compilation_id.load(Ordering::SeqCst);
        let _guard = ReloadGuard::enter(&self.in_flight);
        let start = Instant::now();

        let result = self.reload(version).await;
        metrics::record_reload(result.is_ok(), start);

        match &result {
            Ok(snapshot) => {
                tracing::info!(
                    version,
                    matchers = snapshot.matchers().len(),
                    static_routes = snapshot.static_matchers().len(),
                    dynamic_routes = snapshot.dynamic_matchers().len(),
                    duplicates = snapshot.duplicates().len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Routes compiled"
                );
            }
            Err(err) => {
                tracing::error!(
                    version,
                    error = %err,
                    "Route reload failed, keeping previous routes"
                );
            }
        }
        result.map(|_| ())
    }

    async fn reload(&self, version: u64) -> RoutingResult<Arc<CompiledSnapshot>> {
        let providers = self.providers.read().expect("providers lock poisoned").clone();
        let lists = try_join_all(providers.iter().map(|provider| provider.matchers())).await?;
        let matchers: Vec<SharedMatcher> = lists.into_iter().flatten().collect();

        let previous = self.snapshot.load_full();
        let snapshot = Arc::new(CompiledSnapshot::compile(matchers, &previous, version));
        self.publish(&snapshot)?;

        for (pathname, matchers) in snapshot.duplicates() {
            let pages: Vec<&str> = matchers
                .iter()
                .map(|m| m.definition().page.as_str())
                .collect();
            tracing::warn!(
                pathname = %pathname,
                pages = ?pages,
                "Duplicate routes, first one wins"
            );
        }
        metrics::record_snapshot(snapshot.matchers().len(), snapshot.duplicates().len());
        Ok(snapshot)
    }

    /// Publish `snapshot` if no provider was registered since its version
    /// was taken.
    ///
    /// The providers read lock is held across the check and the stores, so
    /// a `push` lands either before the check (and the publish fails) or
    /// after the stores (and queries fail until the next reload).
    fn publish(&self, snapshot: &Arc<CompiledSnapshot>) -> RoutingResult<()> {
        let _providers = self.providers.read().expect("providers lock poisoned");
        let version = snapshot.version();
        let current = self.compilation_id.load(Ordering::SeqCst);
        if current != version {
            return Err(RoutingError::InvariantViolation(format!(
                "providers changed during reload (compiled version {version}, current {current})"
            )));
        }

        self.snapshot.store(Arc::clone(snapshot));
        self.last_compilation_id.store(version, Ordering::SeqCst);
        self.has_compiled.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Resolve once no reload is in flight. Returns at once when idle.
    pub async fn wait_till_ready(&self) {
        let mut rx = self.in_flight.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    pub fn state(&self) -> ManagerState {
        if *self.in_flight.borrow() > 0 {
            ManagerState::Compiling
        } else if self.has_compiled.load(Ordering::SeqCst) {
            ManagerState::Ready
        } else {
            ManagerState::Unloaded
        }
    }

    /// First match for `pathname`, if any.
    pub fn match_route(
        &self,
        pathname: &str,
        options: &MatchOptions,
    ) -> RoutingResult<Option<RouteMatch>> {
        let found = self.match_all(pathname, options)?.next().transpose()?;
        metrics::record_match(found.is_some());
        Ok(found)
    }

    /// Every match for `pathname`, most specific first.
    pub fn match_all(&self, pathname: &str, options: &MatchOptions) -> RoutingResult<RouteMatches> {
        let current = self.compilation_id.load(Ordering::SeqCst);
        let compiled = self.last_compilation_id.load(Ordering::SeqCst);
        if current != compiled {
            return Err(RoutingError::InvariantViolation(format!(
                "routes queried before reload (compiled version {compiled}, current {current})"
            )));
        }
        if !self.has_compiled.load(Ordering::SeqCst) {
            return Err(RoutingError::InvariantViolation(
                "routes queried before the first successful reload".to_string(),
            ));
        }

        let options = self.normalizer.normalize(pathname, options);
        Ok(RouteMatches::new(self.snapshot.load_full(), options))
    }

    /// Colliding matchers by pathname, from the current snapshot.
    pub fn duplicates(&self) -> BTreeMap<String, Vec<SharedMatcher>> {
        self.snapshot.load().duplicates().clone()
    }

    /// The current snapshot, pinned.
    pub fn snapshot(&self) -> Arc<CompiledSnapshot> {
        self.snapshot.load_full()
    }
}

impl Default for RouteMatcherManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts a reload as in flight until dropped.
struct ReloadGuard<'a> {
    in_flight: &'a watch::Sender<usize>,
}

impl<'a> ReloadGuard<'a> {
    fn enter(in_flight: &'a watch::Sender<usize>) -> Self {
        in_flight.send_modify(|count| *count += 1);
        Self { in_flight }
    }
}

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.send_modify(|count| *count -= 1);
    }
}
