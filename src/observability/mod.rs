//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Manager and providers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stderr via tracing-subscriber
//!     → whichever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (version, counts, elapsed_ms) on every reload event
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;
