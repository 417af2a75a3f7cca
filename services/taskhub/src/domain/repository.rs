#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use taskhub_domain::id::{RoleId, TaskId, TeamId, UserId};
use taskhub_domain::pagination::{Page, PageRequest};
use taskhub_domain::sort::Sort;
use taskhub_domain::task::TaskStatus;

use crate::domain::types::{
    AssignmentDelta, Lockout, Role, RoleMember, Task, TaskDraft, TaskFilter, TaskSortField, Team,
    TeamDraft, TeamSortField, User, UserProfile, UserSortField,
};
use crate::error::TaskhubError;

/// Snapshot reads and delta writes against the `user_roles` join table.
pub trait RoleAssignmentRepository: Send + Sync {
    async fn find_role(&self, id: RoleId) -> Result<Option<Role>, TaskhubError>;
    async fn user_exists(&self, id: UserId) -> Result<bool, TaskhubError>;
    async fn role_exists(&self, id: RoleId) -> Result<bool, TaskhubError>;
    async fn user_ids_in_role(&self, role_id: RoleId) -> Result<HashSet<UserId>, TaskhubError>;
    async fn role_ids_of_user(&self, user_id: UserId) -> Result<HashSet<RoleId>, TaskhubError>;
    async fn assignment_exists(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<bool, TaskhubError>;

    /// Apply every removal and insert of `delta` in one transaction.
    /// Inserting a pair that already exists is a no-op.
    async fn apply(&self, delta: &AssignmentDelta) -> Result<(), TaskhubError>;
}

/// Repository for role definitions.
pub trait RoleRepository: Send + Sync {
    /// Roles whose name contains `q` (case-insensitive), ordered by name.
    async fn list(&self, q: Option<&str>) -> Result<Vec<Role>, TaskhubError>;
    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, TaskhubError>;
    async fn find_by_normalized_name(
        &self,
        normalized_name: &str,
    ) -> Result<Option<Role>, TaskhubError>;
    async fn find_by_normalized_names(
        &self,
        normalized_names: &[String],
    ) -> Result<Vec<Role>, TaskhubError>;
    async fn create(&self, role: &Role) -> Result<(), TaskhubError>;
    async fn rename(&self, id: RoleId, name: &str, normalized_name: &str)
    -> Result<(), TaskhubError>;
    async fn delete(&self, id: RoleId) -> Result<(), TaskhubError>;
    /// Members of a role ordered by username.
    async fn members(&self, id: RoleId) -> Result<Vec<RoleMember>, TaskhubError>;
}

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    /// Users whose username, email or phone contains `q`, ordered by `sort` then id.
    async fn list(
        &self,
        q: Option<&str>,
        sort: Sort<UserSortField>,
        page: PageRequest,
    ) -> Result<Page<User>, TaskhubError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, TaskhubError>;
    /// Lookup by username, ignoring case.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, TaskhubError>;
    async fn role_names(&self, id: UserId) -> Result<Vec<String>, TaskhubError>;
    /// Insert the user and its role rows in one transaction.
    async fn create(&self, user: &User, role_ids: &[RoleId]) -> Result<(), TaskhubError>;
    async fn update_profile(&self, id: UserId, profile: &UserProfile)
    -> Result<(), TaskhubError>;
    async fn set_lockout(&self, id: UserId, lockout: Lockout) -> Result<(), TaskhubError>;
}

/// Repository for teams.
pub trait TeamRepository: Send + Sync {
    async fn list(
        &self,
        sort: Sort<TeamSortField>,
        page: PageRequest,
    ) -> Result<Page<Team>, TaskhubError>;
    async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>, TaskhubError>;
    async fn create(&self, draft: &TeamDraft) -> Result<Team, TaskhubError>;
    async fn update(&self, id: TeamId, draft: &TeamDraft) -> Result<(), TaskhubError>;
    async fn delete(&self, id: TeamId) -> Result<(), TaskhubError>;
    /// Point `team_id` of every listed user at `id`. Returns the number of rows changed.
    async fn assign_users(&self, id: TeamId, user_ids: &[UserId]) -> Result<u64, TaskhubError>;
}

/// Repository for task items.
pub trait TaskRepository: Send + Sync {
    /// Tasks matching `filter`, ordered by `sort` then id.
    async fn list(
        &self,
        filter: &TaskFilter,
        sort: Sort<TaskSortField>,
        page: PageRequest,
    ) -> Result<Page<Task>, TaskhubError>;
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskhubError>;
    async fn create(&self, draft: &TaskDraft, created_by: UserId) -> Result<Task, TaskhubError>;
    async fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<(), TaskhubError>;
    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<(), TaskhubError>;
    async fn delete(&self, id: TaskId) -> Result<(), TaskhubError>;
}
