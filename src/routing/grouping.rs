//! Grouping and duplicate detection.
//!
//! # Responsibilities
//! - Partition a flat matcher list by identity
//! - Keep the first matcher per identity as canonical
//! - Record colliding identities for diagnostics
//!
//! # Design Decisions
//! - Input order decides which duplicate wins; providers control precedence
//!   by registration order
//! - `all` keeps every matcher per pathname, including locale variants,
//!   because exact-output queries must see all of them
//! - Maps are ordered so diagnostics print deterministically

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::routing::matcher::SharedMatcher;

/// Output of [`group`].
#[derive(Debug, Clone, Default)]
pub struct MatcherGroups {
    /// Definition pathname → every matcher for it, in input order.
    pub all: BTreeMap<String, Vec<SharedMatcher>>,

    /// Definition pathname → every matcher whose identity collided.
    pub duplicates: BTreeMap<String, Vec<SharedMatcher>>,

    /// One matcher per identity, in first-seen order.
    pub canonical: Vec<SharedMatcher>,
}

/// Group matchers by identity.
pub fn group(matchers: &[SharedMatcher]) -> MatcherGroups {
    let mut all: BTreeMap<String, Vec<SharedMatcher>> = BTreeMap::new();
    let mut by_identity: HashMap<&str, Vec<&SharedMatcher>> = HashMap::new();
    let mut canonical = Vec::new();

    for matcher in matchers {
        all.entry(matcher.definition().pathname.clone())
            .or_default()
            .push(Arc::clone(matcher));

        let same = by_identity.entry(matcher.identity()).or_default();
        if same.is_empty() {
            canonical.push(Arc::clone(matcher));
        }
        same.push(matcher);
    }

    let mut duplicates: BTreeMap<String, Vec<SharedMatcher>> = BTreeMap::new();
    for matcher in &canonical {
        let same = &by_identity[matcher.identity()];
        if same.len() > 1 {
            duplicates
                .entry(matcher.definition().pathname.clone())
                .or_default()
                .extend(same.iter().map(|m| Arc::clone(m)));
        }
    }

    MatcherGroups {
        all,
        duplicates,
        canonical,
    }
}
