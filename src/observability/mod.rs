//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → structured log events (tracing)
//!     → counters and histograms (metrics.rs)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging; the request ID flows through all subsystems
//! - Metrics are cheap (atomic increments)
//! - Security rejections (origin, rate limit) are logged at warn and counted

pub mod metrics;
