//! Per-IP rate limiting with fixed windows.
//!
//! # Responsibilities
//! - Gate API traffic per client IP: `max_requests` per `window_ms`
//! - Enforce the production origin/host allow-list before counting
//! - Bound tracked-IP memory with a size-triggered sweep of expired entries
//!
//! # Design Decisions
//! - The counter store is injected behind [`RateLimitStore`] so tests drive
//!   the in-memory map directly and a shared external counter can replace it
//!   when running more than one instance; with the default in-process store,
//!   limits are enforced per process
//! - The window check is a single atomic `hit` under the store's per-key
//!   entry guard, so two concurrent requests cannot both pass at the limit
//! - Rejection is normal control flow: a structured 403/429, never an error

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::config::schema::RateLimitConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::security::origin::OriginPolicy;

/// Fallback client key when no `X-Forwarded-For` header is present.
const UNKNOWN_CLIENT: &str = "127.0.0.1";

/// Counter state for one client IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Requests seen in the current window.
    pub count: u32,
    /// Absolute end of the current window.
    pub reset_at: DateTime<Utc>,
}

/// Outcome of one counted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitOutcome {
    Allowed { remaining: u32 },
    Limited { reset_at: DateTime<Utc> },
}

/// Counter storage for the limiter.
///
/// `hit` must be atomic per key: the lookup, window comparison, and
/// increment happen as one operation.
pub trait RateLimitStore: Send + Sync {
    /// Count one request against `key` at time `now`.
    fn hit(&self, key: &str, now: DateTime<Utc>, window: Duration, limit: u32) -> RateLimitOutcome;

    /// Remove every entry whose window ended before `now`.
    fn sweep(&self, now: DateTime<Utc>);

    /// Number of keys currently tracked.
    fn tracked(&self) -> usize;
}

/// The default in-process store.
#[derive(Default)]
pub struct MemoryRateLimitStore {
    entries: DashMap<String, RateLimitEntry>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    fn hit(&self, key: &str, now: DateTime<Utc>, window: Duration, limit: u32) -> RateLimitOutcome {
        // The entry guard holds the shard lock for this key, making the
        // read-check-write sequence atomic.
        let mut entry = self.entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            reset_at: now + window,
        });

        if now >= entry.reset_at {
            // Window elapsed: restart the count.
            entry.count = 1;
            entry.reset_at = now + window;
            return RateLimitOutcome::Allowed {
                remaining: limit.saturating_sub(1),
            };
        }

        if entry.count >= limit {
            return RateLimitOutcome::Limited {
                reset_at: entry.reset_at,
            };
        }

        entry.count += 1;
        RateLimitOutcome::Allowed {
            remaining: limit.saturating_sub(entry.count),
        }
    }

    fn sweep(&self, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| entry.reset_at >= now);
    }

    fn tracked(&self) -> usize {
        self.entries.len()
    }
}

/// The request gate: origin allow-list plus per-IP fixed-window counting.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    origin: OriginPolicy,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, origin: OriginPolicy, store: Arc<dyn RateLimitStore>) -> Self {
        Self {
            store,
            origin,
            config,
        }
    }

    /// Gate one request. `Ok(())` means proceed.
    pub fn check(&self, headers: &HeaderMap, now: DateTime<Utc>) -> Result<(), ApiError> {
        let origin = headers.get("origin").and_then(|v| v.to_str().ok());
        let host = headers.get("host").and_then(|v| v.to_str().ok());
        if !self.origin.permits(origin, host) {
            return Err(ApiError::ForbiddenOrigin);
        }

        if !self.config.enabled {
            return Ok(());
        }

        let ip = client_ip(headers);
        let window = Duration::milliseconds(self.config.window_ms as i64);
        let outcome = self.store.hit(&ip, now, window, self.config.max_requests);

        // Size-triggered housekeeping; an O(n) scan, no background timer.
        if self.store.tracked() > self.config.max_tracked_ips {
            self.store.sweep(now);
        }

        match outcome {
            RateLimitOutcome::Allowed { .. } => Ok(()),
            RateLimitOutcome::Limited { reset_at } => Err(ApiError::RateLimited {
                limit: self.config.max_requests,
                reset_at,
            }),
        }
    }

    /// Tracked-IP count, for the admin surface.
    pub fn tracked_ips(&self) -> usize {
        self.store.tracked()
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

/// First element of `X-Forwarded-For`, trusting the upstream proxy.
/// No syntax validation is applied.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Middleware gating the API routes.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match limiter.check(request.headers(), Utc::now()) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            match &err {
                ApiError::ForbiddenOrigin => {
                    tracing::warn!(
                        origin = ?request.headers().get("origin"),
                        host = ?request.headers().get("host"),
                        "Rejected request from unauthorized domain"
                    );
                    metrics::record_origin_rejected();
                }
                ApiError::RateLimited { reset_at, .. } => {
                    tracing::warn!(
                        client = %client_ip(request.headers()),
                        reset = %reset_at,
                        "Rate limit exceeded"
                    );
                    metrics::record_rate_limited();
                }
                _ => {}
            }
            err.into_response()
        }
    }
}
