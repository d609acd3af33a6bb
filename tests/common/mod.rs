//! Shared providers and fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use route_matcher::providers::{DefinitionProvider, ProviderError, RouteMatcherProvider};
use route_matcher::routing::{matcher_for, RouteDefinition, RouteKind, SharedMatcher};

/// App page definition for `pathname`, declared at `<pathname>/page`.
pub fn app_page(pathname: &str) -> RouteDefinition {
    app_page_at(pathname, &format!("{}/page", pathname.trim_end_matches('/')))
}

/// App page definition for `pathname` declared at `page`.
pub fn app_page_at(pathname: &str, page: &str) -> RouteDefinition {
    RouteDefinition::new(
        RouteKind::AppPage,
        pathname,
        page,
        format!("app{page}"),
        format!("app{page}.js"),
    )
}

pub fn matchers(pathnames: &[&str]) -> Vec<SharedMatcher> {
    pathnames
        .iter()
        .map(|pathname| matcher_for(app_page(pathname)).unwrap())
        .collect()
}

/// Provider returning app pages for `pathnames`, compiled once.
pub fn fixed(pathnames: &[&str]) -> Arc<dyn RouteMatcherProvider> {
    Arc::new(DefinitionProvider::from_matchers(matchers(pathnames)))
}

pub fn fixed_definitions(definitions: Vec<RouteDefinition>) -> Arc<dyn RouteMatcherProvider> {
    Arc::new(DefinitionProvider::new(definitions).unwrap())
}

/// Provider that parks one chosen call until released.
pub struct GatedProvider {
    matchers: Vec<SharedMatcher>,
    gate_on_call: usize,
    calls: AtomicUsize,
    /// Notified when the gated call is parked.
    pub entered: Notify,
    /// Notify to let the gated call finish.
    pub release: Notify,
}

impl GatedProvider {
    /// Gate the `gate_on_call`-th call (1-based).
    pub fn new(pathnames: &[&str], gate_on_call: usize) -> Arc<Self> {
        Arc::new(Self {
            matchers: matchers(pathnames),
            gate_on_call,
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            release: Notify::new(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteMatcherProvider for GatedProvider {
    async fn matchers(&self) -> Result<Vec<SharedMatcher>, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.gate_on_call {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(self.matchers.clone())
    }
}

/// Provider that fails while its switch is on.
pub struct FlakyProvider {
    matchers: Vec<SharedMatcher>,
    failing: AtomicBool,
}

impl FlakyProvider {
    pub fn new(pathnames: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            matchers: matchers(pathnames),
            failing: AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RouteMatcherProvider for FlakyProvider {
    async fn matchers(&self) -> Result<Vec<SharedMatcher>, ProviderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Other("provider unavailable".to_string()));
        }
        Ok(self.matchers.clone())
    }
}

/// Provider that counts calls.
pub struct CountingProvider {
    inner: Arc<dyn RouteMatcherProvider>,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn new(pathnames: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            inner: fixed(pathnames),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteMatcherProvider for CountingProvider {
    async fn matchers(&self) -> Result<Vec<SharedMatcher>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.matchers().await
    }
}
