//! Dashboard badge counts endpoint.

use axum::extract::State;
use axum::{Extension, Json};
use chrono::Local;
use serde::Serialize;

use crate::auth::types::CurrentUser;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::tasks::counts::{compute_counts, local_day_window, TaskCounts};

#[derive(Serialize)]
pub struct CountsResponse {
    pub counts: TaskCounts,
}

/// `GET /api/tasks/count`
pub async fn get_task_counts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<CountsResponse>, ApiError> {
    let window = local_day_window(Local::now());
    let counts = compute_counts(&state.store, &user.id, window)?;
    Ok(Json(CountsResponse { counts }))
}
