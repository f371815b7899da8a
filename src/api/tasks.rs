//! Task CRUD handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::types::CurrentUser;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::storage::memory::NewTask;
use crate::tasks::counts::local_day_window;
use crate::tasks::types::{CreateTaskRequest, Task, TaskFilter, UpdateTaskRequest};

#[derive(Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Serialize)]
pub struct TaskResponse {
    pub message: &'static str,
    pub task: Task,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTaskParams {
    pub id: Option<i64>,
}

/// `GET /api/tasks` — the caller's tasks, newest first, optionally filtered
/// by team, completion state, and "due today".
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<TasksResponse>, ApiError> {
    let mut tasks = state.store.tasks_for_user(&user.id)?;

    if let Some(team_id) = filter.team_id {
        tasks.retain(|t| t.team_id == team_id);
    }
    if let Some(completed) = filter.completed {
        tasks.retain(|t| t.completed == completed);
    }
    if filter.today == Some(true) {
        let (start, end) = local_day_window(Local::now());
        tasks.retain(|t| t.due_date.is_some_and(|due| due >= start && due < end));
    }

    Ok(Json(TasksResponse { tasks }))
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let team = state.store.team(payload.team_id)?;
    if !team.is_some_and(|t| t.owner_id == user.id) {
        return Err(ApiError::Forbidden(
            "Team not found or access denied".to_string(),
        ));
    }

    let task = state.store.create_task(
        NewTask {
            title: payload.title,
            description: payload.description,
            team_id: payload.team_id,
            created_by_id: user.id.clone(),
            // Unassigned tasks belong to their creator.
            assigned_to_id: payload.assigned_to_id.or(Some(user.id)),
            due_date: payload.due_date,
            completed: payload.completed,
        },
        Utc::now(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully",
            task,
        }),
    ))
}

/// `PUT /api/tasks` — partial update; absent fields stay untouched.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let Some(mut task) = state
        .store
        .task(payload.id)?
        .filter(|t| t.created_by_id == user.id)
    else {
        return Err(ApiError::NotFound(
            "Task not found or access denied".to_string(),
        ));
    };

    if let Some(team_id) = payload.team_id {
        let team = state.store.team(team_id)?;
        if !team.is_some_and(|t| t.owner_id == user.id) {
            return Err(ApiError::Forbidden(
                "Team not found or access denied".to_string(),
            ));
        }
        task.team_id = team_id;
    }

    let now = Utc::now();
    if let Some(title) = payload.title {
        task.title = title;
    }
    if let Some(description) = payload.description {
        task.description = Some(description);
    }
    if let Some(assigned_to_id) = payload.assigned_to_id {
        task.assigned_to_id = Some(assigned_to_id);
    }
    if let Some(due_date) = payload.due_date {
        task.due_date = Some(due_date);
    }
    if let Some(completed) = payload.completed {
        task.set_completed(completed, now);
    }
    task.updated_at = now;

    state.store.update_task(task.clone())?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully",
        task,
    }))
}

/// `DELETE /api/tasks?id=`
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<DeleteTaskParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(id) = params.id else {
        return Err(ApiError::Validation("Task ID is required".to_string()));
    };

    let owned = state
        .store
        .task(id)?
        .is_some_and(|t| t.created_by_id == user.id);
    if !owned {
        return Err(ApiError::NotFound(
            "Task not found or access denied".to_string(),
        ));
    }

    state.store.delete_task(id)?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully",
    }))
}
