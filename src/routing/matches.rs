//! Lazy match sequence over a pinned snapshot.
//!
//! # Responsibilities
//! - Walk exact-output, static and dynamic candidates in that order
//! - Yield matches one at a time, never precomputing the full list
//!
//! # Design Decisions
//! - The iterator owns an `Arc` to the snapshot it started on, so a reload
//!   that lands mid-iteration cannot change what this query observes
//! - An error ends the sequence; nothing is yielded after it

use std::sync::Arc;

use crate::routing::error::RoutingError;
use crate::routing::matcher::{RouteMatch, SharedMatcher};
use crate::routing::options::NormalizedMatchOptions;
use crate::routing::pathname::is_dynamic_route;
use crate::routing::snapshot::CompiledSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Output(usize),
    Static(usize),
    Dynamic(usize),
    Done,
}

/// Iterator of matches for one query.
#[derive(Debug)]
pub struct RouteMatches {
    snapshot: Arc<CompiledSnapshot>,
    options: NormalizedMatchOptions,
    cursor: Cursor,
}

impl RouteMatches {
    /// Start a query against `snapshot`.
    pub fn new(snapshot: Arc<CompiledSnapshot>, options: NormalizedMatchOptions) -> Self {
        let cursor = if options.matched_output_pathname.is_some() {
            Cursor::Output(0)
        } else if is_dynamic_route(&options.pathname) {
            Cursor::Dynamic(0)
        } else {
            Cursor::Static(0)
        };
        Self {
            snapshot,
            options,
            cursor,
        }
    }

    fn candidate(&self) -> Option<&SharedMatcher> {
        match self.cursor {
            Cursor::Output(i) => self
                .options
                .matched_output_pathname
                .as_ref()
                .and_then(|output| self.snapshot.all().get(output))
                .and_then(|matchers| matchers.get(i)),
            Cursor::Static(i) => self.snapshot.static_matchers().get(i),
            Cursor::Dynamic(i) => self.snapshot.dynamic_matchers().get(i),
            Cursor::Done => None,
        }
    }

    /// Move past the current candidate, or to the next phase when the
    /// current one is exhausted.
    fn advance(&mut self, exhausted: bool) {
        self.cursor = match (self.cursor, exhausted) {
            (Cursor::Output(_), true) => Cursor::Done,
            (Cursor::Output(i), false) => Cursor::Output(i + 1),
            (Cursor::Static(_), true) => Cursor::Dynamic(0),
            (Cursor::Static(i), false) => Cursor::Static(i + 1),
            (Cursor::Dynamic(_), true) => Cursor::Done,
            (Cursor::Dynamic(i), false) => Cursor::Dynamic(i + 1),
            (Cursor::Done, _) => Cursor::Done,
        };
    }
}

impl Iterator for RouteMatches {
    type Item = Result<RouteMatch, RoutingError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor != Cursor::Done {
            let Some(matcher) = self.candidate().cloned() else {
                self.advance(true);
                continue;
            };

            match matcher.match_options(&self.options) {
                Ok(Some(found)) => {
                    // Exact-output queries yield at most one match.
                    if matches!(self.cursor, Cursor::Output(_)) {
                        self.cursor = Cursor::Done;
                    } else {
                        self.advance(false);
                    }
                    return Some(Ok(found));
                }
                Ok(None) => self.advance(false),
                Err(err) => {
                    self.cursor = Cursor::Done;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}
