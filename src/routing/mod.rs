//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route compilation (on every reload):
//!     providers → Vec<RouteMatcher>
//!     → grouping.rs (dedup by identity, keep first)
//!     → ordering.rs (sort dynamic routes by specificity)
//!     → snapshot.rs (freeze as immutable CompiledSnapshot)
//!     → manager.rs (atomic swap)
//!
//! Query:
//!     (pathname, MatchOptions)
//!     → options.rs / i18n.rs (normalize, resolve locale)
//!     → matches.rs (exact output | static → dynamic)
//!     → RouteMatch { definition, params }
//! ```
//!
//! # Design Decisions
//! - Snapshots compiled off the hot path, immutable once published
//! - Matching is a linear scan over pre-ordered candidates, no regex
//! - Deterministic: same routes always yield the same order
//! - First match wins for `match_route`; `match_all` exposes the rest

pub mod app_paths;
pub mod definition;
pub mod error;
pub mod grouping;
pub mod i18n;
pub mod manager;
pub mod matcher;
pub mod matches;
pub mod options;
pub mod ordering;
pub mod pathname;
pub mod snapshot;

pub use definition::{RouteDefinition, RouteKind, RouteLocale};
pub use error::{RoutingError, RoutingResult};
pub use manager::{ManagerState, RouteMatcherManager};
pub use matcher::{matcher_for, RouteMatch, RouteMatcher, SharedMatcher};
pub use matches::RouteMatches;
pub use options::{LocaleContext, MatchOptions, NormalizedMatchOptions, Normalizer};
pub use pathname::{ParamValue, Params, PathnameMatcher, PatternError};
pub use snapshot::CompiledSnapshot;
