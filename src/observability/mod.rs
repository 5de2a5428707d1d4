//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate middleware and proxy handler produce:
//!     → logging.rs (structured log events, request_id/path/decision fields)
//!     → metrics.rs (decision counters, request latency)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through logs and to the upstream
//! - Metrics are cheap (atomic increments); recording without an installed
//!   exporter is a no-op

pub mod logging;
pub mod metrics;
