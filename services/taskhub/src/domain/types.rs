use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use taskhub_domain::id::{RoleId, TaskId, TeamId, UserId};
use taskhub_domain::sort::{SortField, SortOrder};
use taskhub_domain::task::TaskStatus;

// ── Roles ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub normalized_name: String,
}

/// Id of the protected Admin role, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminRole {
    pub id: RoleId,
}

/// A user as listed under a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMember {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

// ── Assignments ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Assignment {
    pub user_id: UserId,
    pub role_id: RoleId,
}

/// Rows to delete from and insert into `user_roles`, applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentDelta {
    pub remove: Vec<Assignment>,
    pub add: Vec<Assignment>,
}

impl AssignmentDelta {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

/// Result of a reconciliation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentOutcome {
    pub message: String,
    /// Notes about silently corrected input.
    pub advisories: Vec<String>,
    pub removed: usize,
    pub added: usize,
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub normalized_username: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub team_id: Option<TeamId>,
    pub lockout_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    pub access_failed_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Locked while `lockout_end` lies in the future.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lockout_end.is_some_and(|end| end > now)
    }
}

/// A user together with the names of the roles it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithRoles {
    pub user: User,
    pub roles: Vec<String>,
}

/// Mutable profile fields written by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub team_id: Option<TeamId>,
}

/// Lockout columns written by deactivate/reactivate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lockout {
    pub enabled: bool,
    pub end: Option<DateTime<Utc>>,
    pub reset_failed_count: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortField {
    #[default]
    Username,
    Email,
    CreatedAt,
}

impl SortField for UserSortField {}

/// End timestamp used to lock an account indefinitely.
pub fn permanent_lockout_end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// ── Teams ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraft {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSortField {
    #[default]
    Name,
    CreatedAt,
}

impl SortField for TeamSortField {}

// ── Tasks ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<UserId>,
    pub created_by: UserId,
    pub team_id: Option<TeamId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied task fields for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<UserId>,
    pub team_id: Option<TeamId>,
}

/// Optional filters for task listing; all present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<UserId>,
    pub team_id: Option<TeamId>,
    /// Matches tasks due on this calendar day (UTC).
    pub due_date: Option<chrono::NaiveDate>,
}

/// Newest first unless the caller asks otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSortField {
    #[default]
    CreatedAt,
    Title,
    DueDate,
    Status,
}

impl SortField for TaskSortField {
    const DEFAULT_ORDER: SortOrder = SortOrder::Desc;
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| task.status == s)
            && self.assigned_to.is_none_or(|u| task.assigned_to == Some(u))
            && self.team_id.is_none_or(|t| task.team_id == Some(t))
            && self
                .due_date
                .is_none_or(|d| task.due_date.is_some_and(|due| due.date_naive() == d))
    }
}
