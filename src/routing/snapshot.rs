//! Compiled matcher snapshot.
//!
//! A snapshot is built in one pass from one matcher list and never mutated
//! afterwards. The manager publishes snapshots by swapping an `Arc`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::routing::grouping::group;
use crate::routing::matcher::SharedMatcher;
use crate::routing::ordering::sort_dynamic;

/// Immutable, fully compiled matcher set.
#[derive(Debug, Default)]
pub struct CompiledSnapshot {
    version: u64,
    matchers: Vec<SharedMatcher>,
    static_matchers: Arc<Vec<SharedMatcher>>,
    dynamic_matchers: Arc<Vec<SharedMatcher>>,
    all: BTreeMap<String, Vec<SharedMatcher>>,
    duplicates: BTreeMap<String, Vec<SharedMatcher>>,
}

impl CompiledSnapshot {
    /// Compile `matchers` at `version`.
    ///
    /// When `matchers` is structurally identical to the list `previous` was
    /// built from, the static and dynamic sets are carried over instead of
    /// being partitioned and sorted again.
    pub fn compile(
        matchers: Vec<SharedMatcher>,
        previous: &CompiledSnapshot,
        version: u64,
    ) -> Self {
        let groups = group(&matchers);

        let (static_matchers, dynamic_matchers) = if same_matchers(&previous.matchers, &matchers) {
            tracing::debug!(version, "Matcher list unchanged, reusing compiled order");
            (
                Arc::clone(&previous.static_matchers),
                Arc::clone(&previous.dynamic_matchers),
            )
        } else {
            let (mut dynamic, statics): (Vec<_>, Vec<_>) = groups
                .canonical
                .into_iter()
                .partition(|matcher| matcher.is_dynamic());
            sort_dynamic(&mut dynamic);
            (Arc::new(statics), Arc::new(dynamic))
        };

        Self {
            version,
            matchers,
            static_matchers,
            dynamic_matchers,
            all: groups.all,
            duplicates: groups.duplicates,
        }
    }

    /// Compilation version this snapshot was built at.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Every matcher fetched from providers, in fetch order.
    pub fn matchers(&self) -> &[SharedMatcher] {
        &self.matchers
    }

    /// Canonical static matchers.
    pub fn static_matchers(&self) -> &[SharedMatcher] {
        &self.static_matchers
    }

    /// Canonical dynamic matchers, most specific first.
    pub fn dynamic_matchers(&self) -> &[SharedMatcher] {
        &self.dynamic_matchers
    }

    /// Definition pathname → all matchers for it.
    pub fn all(&self) -> &BTreeMap<String, Vec<SharedMatcher>> {
        &self.all
    }

    /// Definition pathname → colliding matchers. Diagnostic only.
    pub fn duplicates(&self) -> &BTreeMap<String, Vec<SharedMatcher>> {
        &self.duplicates
    }

    /// Returns true when both snapshots share the same compiled order.
    pub fn shares_order_with(&self, other: &CompiledSnapshot) -> bool {
        Arc::ptr_eq(&self.static_matchers, &other.static_matchers)
            && Arc::ptr_eq(&self.dynamic_matchers, &other.dynamic_matchers)
    }
}

/// Structural comparison: same identities and equal definitions, in order.
fn same_matchers(previous: &[SharedMatcher], next: &[SharedMatcher]) -> bool {
    previous.len() == next.len()
        && previous.iter().zip(next).all(|(a, b)| {
            Arc::ptr_eq(a, b) || (a.identity() == b.identity() && a.definition() == b.definition())
        })
}
