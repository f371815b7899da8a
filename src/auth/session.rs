//! Bearer-session middleware and token issuance.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::auth::types::{CurrentUser, Session};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::storage::{MemoryStore, StorageError};

/// Sessions live for 30 days; expired ones are dropped on first lookup.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Mint and store a fresh session for a user.
pub fn issue_session(
    store: &MemoryStore,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Session, StorageError> {
    let session = Session {
        token: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        expires_at: now + Duration::days(SESSION_TTL_DAYS),
    };
    store.insert_session(session.clone())?;
    Ok(session)
}

/// Middleware guarding the protected API routes.
///
/// Resolves `Authorization: Bearer <token>` to a [`CurrentUser`] request
/// extension, or answers 401 without invoking the handler.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return ApiError::Unauthorized.into_response();
    };

    match state.store.session(token) {
        Ok(Some(session)) => {
            if session.is_expired(Utc::now()) {
                let _ = state.store.remove_session(&session.token);
                return ApiError::Unauthorized.into_response();
            }
            request.extensions_mut().insert(CurrentUser {
                id: session.user_id,
            });
            next.run(request).await
        }
        Ok(None) => ApiError::Unauthorized.into_response(),
        Err(err) => ApiError::Storage(err).into_response(),
    }
}
