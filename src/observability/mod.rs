//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Tracer / proxies produce:
//!     → logging.rs (structured diagnostic events via `tracing`)
//!     → metrics.rs (call counters and durations via `metrics`)
//!
//! Trace lines themselves go to a TraceSink (see trace::sink),
//! which by default forwards into the same `tracing` subscriber.
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or exporter on its own
//! - Binaries call `logging::init_logging` once at startup
//! - Metric updates go through the `metrics` facade and are no-ops without a recorder

pub mod logging;
pub mod metrics;
