//! In-memory store with an optional JSON snapshot.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::auth::types::{Session, User};
use crate::storage::StorageError;
use crate::tasks::types::Task;
use crate::teams::types::{Team, TeamMember};

/// Fields for a task about to be created; the store allocates the id and
/// stamps the timestamps.
#[derive(Debug)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub team_id: i64,
    pub created_by_id: String,
    pub assigned_to_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
}

/// On-disk snapshot format. Sessions are deliberately absent.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    users: Vec<User>,
    teams: Vec<Team>,
    team_members: Vec<TeamMember>,
    tasks: Vec<Task>,
    next_team_id: i64,
    next_member_id: i64,
    next_task_id: i64,
}

/// Concurrent in-memory store backing the API handlers.
///
/// Every data operation returns `Result` so handlers treat the store as a
/// fallible collaborator and map failures to a single internal-error
/// response; the in-memory implementation itself only fails on snapshot IO.
pub struct MemoryStore {
    users: DashMap<String, User>,
    sessions: DashMap<String, Session>,
    teams: DashMap<i64, Team>,
    team_members: DashMap<i64, TeamMember>,
    tasks: DashMap<i64, Task>,
    next_team_id: AtomicI64,
    next_member_id: AtomicI64,
    next_task_id: AtomicI64,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store with no snapshot backing.
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            sessions: DashMap::new(),
            teams: DashMap::new(),
            team_members: DashMap::new(),
            tasks: DashMap::new(),
            next_team_id: AtomicI64::new(1),
            next_member_id: AtomicI64::new(1),
            next_task_id: AtomicI64::new(1),
            snapshot_path: None,
        }
    }

    /// Create a store backed by a JSON snapshot file. A missing file is an
    /// empty store; a malformed file is an error.
    pub fn with_snapshot(path: &Path) -> Result<Self, StorageError> {
        let mut store = Self::new();
        store.snapshot_path = Some(path.to_path_buf());

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            for user in snapshot.users {
                store.users.insert(user.id.clone(), user);
            }
            for team in snapshot.teams {
                store.teams.insert(team.id, team);
            }
            for member in snapshot.team_members {
                store.team_members.insert(member.id, member);
            }
            for task in snapshot.tasks {
                store.tasks.insert(task.id, task);
            }
            store.next_team_id.store(snapshot.next_team_id.max(1), Ordering::SeqCst);
            store.next_member_id.store(snapshot.next_member_id.max(1), Ordering::SeqCst);
            store.next_task_id.store(snapshot.next_task_id.max(1), Ordering::SeqCst);
        }

        Ok(store)
    }

    /// Write the current contents to the snapshot file, if one is configured.
    pub fn save(&self) -> Result<(), StorageError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let snapshot = Snapshot {
            users: self.users.iter().map(|e| e.value().clone()).collect(),
            teams: self.teams.iter().map(|e| e.value().clone()).collect(),
            team_members: self.team_members.iter().map(|e| e.value().clone()).collect(),
            tasks: self.tasks.iter().map(|e| e.value().clone()).collect(),
            next_team_id: self.next_team_id.load(Ordering::SeqCst),
            next_member_id: self.next_member_id.load(Ordering::SeqCst),
            next_task_id: self.next_task_id.load(Ordering::SeqCst),
        };

        let content = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    // ---- users ----

    pub fn insert_user(&self, user: User) -> Result<(), StorageError> {
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    pub fn user(&self, id: &str) -> Result<Option<User>, StorageError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    // ---- sessions ----

    pub fn insert_session(&self, session: Session) -> Result<(), StorageError> {
        self.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    pub fn session(&self, token: &str) -> Result<Option<Session>, StorageError> {
        Ok(self.sessions.get(token).map(|s| s.clone()))
    }

    pub fn remove_session(&self, token: &str) -> Result<(), StorageError> {
        self.sessions.remove(token);
        Ok(())
    }

    // ---- teams ----

    pub fn create_team(
        &self,
        owner_id: &str,
        name: &str,
        description: Option<String>,
        emoji: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Team, StorageError> {
        let id = self.next_team_id.fetch_add(1, Ordering::SeqCst);
        let team = Team {
            id,
            name: name.to_string(),
            description,
            emoji,
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.teams.insert(id, team.clone());

        // The owner is always a member of their own team.
        let member_id = self.next_member_id.fetch_add(1, Ordering::SeqCst);
        self.team_members.insert(
            member_id,
            TeamMember {
                id: member_id,
                team_id: id,
                user_id: owner_id.to_string(),
                joined_at: now,
            },
        );

        Ok(team)
    }

    pub fn team(&self, id: i64) -> Result<Option<Team>, StorageError> {
        Ok(self.teams.get(&id).map(|t| t.clone()))
    }

    /// Teams owned by a user, oldest first.
    pub fn teams_for_owner(&self, owner_id: &str) -> Result<Vec<Team>, StorageError> {
        let mut teams: Vec<Team> = self
            .teams
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .map(|t| t.value().clone())
            .collect();
        teams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(teams)
    }

    /// Delete a team and everything hanging off it: tasks first, then
    /// membership rows, then the team itself.
    pub fn delete_team(&self, id: i64) -> Result<(), StorageError> {
        self.tasks.retain(|_, task| task.team_id != id);
        self.team_members.retain(|_, member| member.team_id != id);
        self.teams.remove(&id);
        Ok(())
    }

    // ---- tasks ----

    pub fn create_task(&self, new: NewTask, now: DateTime<Utc>) -> Result<Task, StorageError> {
        let id = self.next_task_id.fetch_add(1, Ordering::SeqCst);
        let mut task = Task {
            id,
            title: new.title,
            description: new.description,
            team_id: new.team_id,
            created_by_id: new.created_by_id,
            assigned_to_id: new.assigned_to_id,
            due_date: new.due_date,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        task.set_completed(new.completed, now);
        self.tasks.insert(id, task.clone());
        Ok(task)
    }

    pub fn task(&self, id: i64) -> Result<Option<Task>, StorageError> {
        Ok(self.tasks.get(&id).map(|t| t.clone()))
    }

    pub fn update_task(&self, task: Task) -> Result<(), StorageError> {
        self.tasks.insert(task.id, task);
        Ok(())
    }

    pub fn delete_task(&self, id: i64) -> Result<(), StorageError> {
        self.tasks.remove(&id);
        Ok(())
    }

    /// Tasks created by a user, newest first.
    pub fn tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, StorageError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.created_by_id == user_id)
            .map(|t| t.value().clone())
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    pub fn count_tasks_for_user(&self, user_id: &str) -> Result<u64, StorageError> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.created_by_id == user_id)
            .count() as u64)
    }

    /// Entity counts for the admin status endpoint.
    pub fn summary(&self) -> (usize, usize, usize) {
        (self.users.len(), self.teams.len(), self.tasks.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
