//! Team entities and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the default team backing the "home" dashboard count.
pub const HOME_TEAM_NAME: &str = "Home";

/// Name of the default team backing the "today" board.
pub const TODAY_TEAM_NAME: &str = "Today";

/// Maximum number of custom teams a user may own, on top of the defaults.
pub const MAX_CUSTOM_TEAMS: usize = 10;

/// A named task list owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Whether this is one of the two default teams provisioned at sign-up.
    /// Name matching is case-sensitive throughout.
    pub fn is_default(&self) -> bool {
        self.name == HOME_TEAM_NAME || self.name == TODAY_TEAM_NAME
    }
}

/// Membership row linking a user to a team. Cascade-deleted with the team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub team_id: i64,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}

/// Payload for `POST /api/teams`.
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
}

impl CreateTeamRequest {
    /// Syntactic validation mirroring the task title rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Team name cannot be empty".to_string());
        }
        if self.name.chars().count() > 255 {
            return Err("Team name must be less than 255 characters".to_string());
        }
        Ok(())
    }
}

/// The default teams provisioned for every new user, in creation order.
pub fn default_teams() -> [(&'static str, &'static str, &'static str); 2] {
    [
        (HOME_TEAM_NAME, "Your personal workspace for organizing tasks", "🏠"),
        (TODAY_TEAM_NAME, "Tasks to focus on today", "📅"),
    ]
}
