//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → origin.rs (production origin/host allow-list)
//!     → rate_limit.rs (per-IP fixed-window limits)
//!     → Pass to api handlers
//! ```
//!
//! # Design Decisions
//! - Fail closed in production: unknown origin AND unknown host → 403
//! - Rejection is normal control flow, surfaced as structured 403/429
//!   responses, never as a panic or opaque error
//! - Host matching is exact or dot-boundary suffix, not substring
//!   containment

pub mod origin;
pub mod rate_limit;

pub use origin::OriginPolicy;
pub use rate_limit::{
    rate_limit_middleware, MemoryRateLimitStore, RateLimitEntry, RateLimitOutcome,
    RateLimitStore, RateLimiter,
};
