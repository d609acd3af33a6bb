//! Metrics collection.
//!
//! # Responsibilities
//! - Define route matcher metrics (reloads, snapshot size, match outcomes)
//! - Record through the `metrics` facade; the embedding application
//!   installs whichever recorder it exports with
//!
//! # Metrics
//! - `route_matcher_reloads_total` (counter): reloads by outcome
//! - `route_matcher_reload_duration_seconds` (histogram): reload latency
//! - `route_matcher_matchers` (gauge): matchers in the current snapshot
//! - `route_matcher_duplicates` (gauge): colliding pathnames
//! - `route_matcher_match_total` (counter): `match_route` calls by result
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op

use std::time::Instant;

use metrics::{counter, gauge, histogram};

pub fn record_reload(success: bool, start: Instant) {
    let outcome = if success { "success" } else { "failure" };
    counter!("route_matcher_reloads_total", "outcome" => outcome).increment(1);
    histogram!("route_matcher_reload_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_snapshot(matchers: usize, duplicates: usize) {
    gauge!("route_matcher_matchers").set(matchers as f64);
    gauge!("route_matcher_duplicates").set(duplicates as f64);
}

pub fn record_match(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("route_matcher_match_total", "result" => result).increment(1);
}
