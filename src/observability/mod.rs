//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay handler produces:
//!     → logging.rs (structured tracing events)
//!     → relay_log.rs (append-only request/URL/result lines)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (tracing subscriber)
//!     → relay log file
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through tracing spans
//! - Relay log writes are best-effort and never fail a request

pub mod logging;
pub mod metrics;
pub mod relay_log;

pub use logging::init_logging;
pub use relay_log::{RelayLog, ResultRecord};
