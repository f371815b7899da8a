//! Per-user dashboard badge counts.
//!
//! # Responsibilities
//! - Compute the "home", "today", and per-team incomplete task counts
//! - Pure read: no writes, identical results between intervening writes
//!
//! # Counting rules
//! - `home`: all incomplete tasks created by the user, across every team —
//!   but 0 when the user has no team named "Home". Name matching is
//!   case-sensitive.
//! - `today`: incomplete tasks whose due date falls inside the local
//!   calendar day, regardless of team.
//! - `teams`: one entry per owned team not named "Home" (the "Today" team
//!   included), counting the user's incomplete tasks in that team. Teams
//!   with nothing open are present with 0, not omitted.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::storage::{MemoryStore, StorageError};
use crate::teams::types::HOME_TEAM_NAME;

/// Derived badge counts, computed fresh per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub home: u64,
    pub today: u64,
    /// Keyed by team id; serialized as a JSON object with string keys.
    pub teams: BTreeMap<i64, u64>,
}

/// The half-open UTC window `[start of local day, start + 24h)` containing
/// `now`, per the server's local calendar.
pub fn local_day_window(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    let start = Local
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or(now);
    let end = start + chrono::Duration::days(1);
    (start.with_timezone(&Utc), end.with_timezone(&Utc))
}

/// Compute the badge counts for one user.
///
/// Fails whole: any storage error aborts the computation with nothing
/// partial returned.
pub fn compute_counts(
    store: &MemoryStore,
    user_id: &str,
    window: (DateTime<Utc>, DateTime<Utc>),
) -> Result<TaskCounts, StorageError> {
    let teams = store.teams_for_owner(user_id)?;
    let has_home_team = teams.iter().any(|t| t.name == HOME_TEAM_NAME);

    let tasks = store.tasks_for_user(user_id)?;
    let open_tasks: Vec<_> = tasks.iter().filter(|t| !t.completed).collect();

    let home = if has_home_team {
        open_tasks.len() as u64
    } else {
        0
    };

    let (start, end) = window;
    let today = open_tasks
        .iter()
        .filter(|t| t.due_date.is_some_and(|due| due >= start && due < end))
        .count() as u64;

    let mut per_team = BTreeMap::new();
    for team in teams.iter().filter(|t| t.name != HOME_TEAM_NAME) {
        let count = open_tasks.iter().filter(|t| t.team_id == team.id).count() as u64;
        per_team.insert(team.id, count);
    }

    Ok(TaskCounts {
        home,
        today,
        teams: per_team,
    })
}
