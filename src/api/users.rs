//! Current-user profile endpoint.

use axum::extract::State;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::types::CurrentUser;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::teams::types::default_teams;

#[derive(Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub task_count: u64,
}

/// `GET /api/user/me`
///
/// Also re-provisions the default teams for users that somehow lost them,
/// mirroring the best-effort creation at registration.
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<MeResponse>, ApiError> {
    let Some(user) = state.store.user(&current.id)? else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    if state.store.teams_for_owner(&user.id)?.is_empty() {
        let now = Utc::now();
        for (name, description, emoji) in default_teams() {
            if let Err(e) = state.store.create_team(
                &user.id,
                name,
                Some(description.to_string()),
                Some(emoji.to_string()),
                now,
            ) {
                tracing::warn!(user = %user.id, team = name, error = %e, "Failed to create fallback team");
            }
        }
    }

    let task_count = state.store.count_tasks_for_user(&user.id)?;

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
        task_count,
    }))
}
