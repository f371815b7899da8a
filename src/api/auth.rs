//! Registration and sign-in.
//!
//! These handlers stand in for the external identity provider: they mint the
//! opaque bearer tokens the rest of the API authenticates with. Credential
//! verification is deliberately absent.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::session::issue_session;
use crate::auth::types::User;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::teams::types::default_teams;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: User,
    pub token: String,
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && !email.contains(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Please enter a valid email address".to_string(),
        ))
    }
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_email(&payload.email)?;

    if state.store.find_user_by_email(&payload.email)?.is_some() {
        return Err(ApiError::Validation(
            "User with this email already exists".to_string(),
        ));
    }

    let now = Utc::now();
    let name = payload
        .name
        .filter(|n| !n.is_empty())
        .or_else(|| payload.email.split('@').next().map(str::to_owned));
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: payload.email,
        name,
        created_at: now,
        updated_at: now,
    };
    state.store.insert_user(user.clone())?;

    // Default teams are best effort: a failure here must not fail the
    // registration, the fallback on /api/user/me re-provisions them.
    for (name, description, emoji) in default_teams() {
        if let Err(e) = state.store.create_team(
            &user.id,
            name,
            Some(description.to_string()),
            Some(emoji.to_string()),
            now,
        ) {
            tracing::warn!(user = %user.id, team = name, error = %e, "Failed to create default team");
        }
    }

    let session = issue_session(&state.store, &user.id, now)?;
    tracing::info!(user = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            user,
            token: session.token,
        }),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Some(user) = state.store.find_user_by_email(&payload.email)? else {
        return Err(ApiError::Unauthorized);
    };

    let session = issue_session(&state.store, &user.id, Utc::now())?;
    Ok(Json(AuthResponse {
        message: "Signed in successfully",
        user,
        token: session.token,
    }))
}
