//! Specificity ordering for dynamic routes.
//!
//! Most specific first:
//! 1. Fewer dynamic segments.
//! 2. No catch-all before any catch-all.
//! 3. Left to right, static < `[param]` < `[...rest]` < `[[...rest]]`.
//! 4. More segments before fewer when every compared position ties.
//! 5. Identity, lexicographically.
//!
//! The last rule makes the order total: two routes with the same shape and
//! different parameter names (`/[a]/x` vs `/[b]/x`) always sort the same way.

use std::cmp::Ordering;

use crate::routing::matcher::{RouteMatcher, SharedMatcher};
use crate::routing::pathname::Segment;

/// Sort dynamic matchers in place, most specific first.
pub fn sort_dynamic(matchers: &mut [SharedMatcher]) {
    matchers.sort_by(|a, b| compare_specificity(a.as_ref(), b.as_ref()));
}

/// Compare two matchers; `Less` means `a` should be tried first.
pub fn compare_specificity(a: &dyn RouteMatcher, b: &dyn RouteMatcher) -> Ordering {
    compare_segments(a.pathname_matcher().segments(), b.pathname_matcher().segments())
        .then_with(|| a.identity().cmp(b.identity()))
}

fn compare_segments(a: &[Segment], b: &[Segment]) -> Ordering {
    dynamic_count(a)
        .cmp(&dynamic_count(b))
        .then_with(|| has_catch_all(a).cmp(&has_catch_all(b)))
        .then_with(|| {
            a.iter()
                .zip(b)
                .map(|(x, y)| x.rank().cmp(&y.rank()))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| b.len().cmp(&a.len()))
}

fn dynamic_count(segments: &[Segment]) -> usize {
    segments.iter().filter(|s| s.is_dynamic()).count()
}

fn has_catch_all(segments: &[Segment]) -> bool {
    segments.iter().any(Segment::is_catch_all)
}
