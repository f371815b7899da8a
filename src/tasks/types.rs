//! Task entities and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do item. Owned by its creator; lives inside one team.
///
/// Invariant: `completed_at` is `Some` if and only if `completed` is true.
/// The two are set and cleared together, never independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub team_id: i64,
    pub created_by_id: String,
    pub assigned_to_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Set or clear completion state, keeping `completed_at` coupled.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
    }
}

/// Payload for `POST /api/tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub team_id: i64,
    pub assigned_to_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
}

/// Payload for `PUT /api/tasks`. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub team_id: Option<i64>,
    pub assigned_to_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

/// Query parameters for `GET /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub team_id: Option<i64>,
    pub completed: Option<bool>,
    pub today: Option<bool>,
}

pub(crate) fn validate_title(title: &str) -> Result<(), String> {
    if title.is_empty() {
        return Err("Task title cannot be empty".to_string());
    }
    if title.chars().count() > 255 {
        return Err("Task title must be less than 255 characters".to_string());
    }
    Ok(())
}

impl CreateTaskRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        if self.team_id <= 0 {
            return Err("Team ID must be a positive integer".to_string());
        }
        Ok(())
    }
}

impl UpdateTaskRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.id <= 0 {
            return Err("Task ID must be a positive integer".to_string());
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(team_id) = self.team_id {
            if team_id <= 0 {
                return Err("Team ID must be a positive integer".to_string());
            }
        }
        Ok(())
    }
}
