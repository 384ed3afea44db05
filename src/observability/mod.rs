//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, storage and lifecycle produce:
//!     → logging.rs (structured log events, per-request spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
