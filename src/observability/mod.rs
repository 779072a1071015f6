//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handler and renderer produce:
//!     → logging.rs (structured log events, request id in span)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through the trace span
//! - Metrics are cheap and no-ops when no recorder is installed

pub mod logging;
pub mod metrics;
