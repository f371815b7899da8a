//! Team CRUD handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::types::CurrentUser;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::teams::types::{CreateTeamRequest, Team, MAX_CUSTOM_TEAMS};

#[derive(Serialize)]
pub struct TeamsResponse {
    pub teams: Vec<Team>,
}

#[derive(Serialize)]
pub struct TeamResponse {
    pub message: &'static str,
    pub team: Team,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTeamParams {
    pub id: Option<i64>,
}

/// `GET /api/teams` — the caller's teams, oldest first.
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<TeamsResponse>, ApiError> {
    let teams = state.store.teams_for_owner(&user.id)?;
    Ok(Json(TeamsResponse { teams }))
}

/// `POST /api/teams` — create a custom team, capped at [`MAX_CUSTOM_TEAMS`]
/// beyond the two defaults.
pub async fn create_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let custom_teams = state
        .store
        .teams_for_owner(&user.id)?
        .iter()
        .filter(|t| !t.is_default())
        .count();
    if custom_teams >= MAX_CUSTOM_TEAMS {
        return Err(ApiError::Forbidden("Team limit reached".to_string()));
    }

    let team = state.store.create_team(
        &user.id,
        &payload.name,
        payload.description,
        payload.emoji,
        Utc::now(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(TeamResponse {
            message: "Team created successfully",
            team,
        }),
    ))
}

/// `DELETE /api/teams?id=` — cascade: tasks first, then membership rows,
/// then the team. The default teams are not deletable.
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<DeleteTeamParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(id) = params.id else {
        return Err(ApiError::Validation("Team ID is required".to_string()));
    };

    let Some(team) = state.store.team(id)?.filter(|t| t.owner_id == user.id) else {
        return Err(ApiError::NotFound(
            "Team not found or access denied".to_string(),
        ));
    };
    if team.is_default() {
        return Err(ApiError::Forbidden(
            "Default teams cannot be deleted".to_string(),
        ));
    }

    state.store.delete_team(id)?;
    Ok(Json(MessageResponse {
        message: "Team deleted successfully",
    }))
}
