//! Response shaping and the API error taxonomy.
//!
//! # Responsibilities
//! - Map every rejection to its status code and JSON body
//! - Attach `X-RateLimit-*` headers to 429 responses
//! - Keep storage internals out of client-visible bodies
//!
//! # Design Decisions
//! - Handlers return `Result<_, ApiError>`; nothing panics across a request
//!   boundary and storage errors are logged here, surfaced only as a
//!   generic 500

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// Every way a request can be rejected.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Origin/host not in the production allow-list.
    #[error("Unauthorized domain")]
    ForbiddenOrigin,

    /// Per-IP request budget exhausted for the current window.
    #[error("Too many requests")]
    RateLimited {
        limit: u32,
        reset_at: DateTime<Utc>,
    },

    /// Missing, unknown, or expired session.
    #[error("Unauthorized")]
    Unauthorized,

    /// Request payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// Authenticated, but not allowed to touch the target.
    #[error("{0}")]
    Forbidden(String),

    /// Target entity does not exist or is not visible to the caller.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected storage fault. Logged; clients see a generic 500.
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reset: Option<String>,
}

impl ErrorBody {
    fn plain(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            limit: None,
            remaining: None,
            reset: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ForbiddenOrigin => (
                StatusCode::FORBIDDEN,
                Json(ErrorBody::plain("Unauthorized domain")),
            )
                .into_response(),

            ApiError::RateLimited { limit, reset_at } => {
                let reset = reset_at.to_rfc3339_opts(SecondsFormat::Millis, true);
                let body = ErrorBody {
                    error: "Too many requests".to_string(),
                    limit: Some(limit),
                    remaining: Some(0),
                    reset: Some(reset.clone()),
                };
                let mut response =
                    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                let headers = response.headers_mut();
                if let Ok(value) = HeaderValue::from_str(&limit.to_string()) {
                    headers.insert("X-RateLimit-Limit", value);
                }
                headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
                if let Ok(value) = HeaderValue::from_str(&reset) {
                    headers.insert("X-RateLimit-Reset", value);
                }
                response
            }

            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody::plain("Unauthorized")),
            )
                .into_response(),

            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::plain(message))).into_response()
            }

            ApiError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Json(ErrorBody::plain(message))).into_response()
            }

            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody::plain(message))).into_response()
            }

            ApiError::Storage(err) => {
                tracing::error!(error = %err, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::plain("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_carries_headers() {
        let err = ApiError::RateLimited {
            limit: 50,
            reset_at: Utc::now(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get("X-RateLimit-Limit").map(|v| v.as_bytes()),
            Some(&b"50"[..])
        );
        assert_eq!(
            response.headers().get("X-RateLimit-Remaining").map(|v| v.as_bytes()),
            Some(&b"0"[..])
        );
        assert!(response.headers().contains_key("X-RateLimit-Reset"));
    }

    #[test]
    fn test_statuses() {
        assert_eq!(
            ApiError::ForbiddenOrigin.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("nope".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
