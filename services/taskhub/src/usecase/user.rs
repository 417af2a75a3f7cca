use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use taskhub_domain::id::{RoleId, TeamId, UserId};
use taskhub_domain::pagination::{Page, PageRequest};
use taskhub_domain::role::{is_admin_name, normalize_name};
use taskhub_domain::sort::Sort;

use crate::domain::repository::{
    RoleAssignmentRepository, RoleRepository, TeamRepository, UserRepository,
};
use crate::domain::types::{
    AssignmentOutcome, Lockout, User, UserProfile, UserSortField, UserWithRoles,
    permanent_lockout_end,
};
use crate::error::TaskhubError;
use crate::usecase::role_assignment::AssignRolesToUserUseCase;

pub const LOCKED: &str = "Locked user";
pub const RELEASED: &str = "Released Lockout";

/// Upper-case and de-duplicate role names, keeping first-seen order.
fn normalized_role_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|n| normalize_name(n))
        .filter(|n| !n.is_empty() && seen.insert(n.clone()))
        .collect()
}

fn required(value: &str, message: &str) -> Result<String, TaskhubError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TaskhubError::validation(message));
    }
    Ok(value.to_owned())
}

async fn ensure_team<T: TeamRepository>(
    teams: &T,
    team_id: Option<TeamId>,
) -> Result<(), TaskhubError> {
    if let Some(id) = team_id {
        teams.find_by_id(id).await?.ok_or(TaskhubError::TeamNotFound)?;
    }
    Ok(())
}

async fn find_user<U: UserRepository>(users: &U, username: &str) -> Result<User, TaskhubError> {
    users
        .find_by_username(username)
        .await?
        .ok_or(TaskhubError::UserNotFound)
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(
        &self,
        q: Option<&str>,
        sort: Sort<UserSortField>,
        page: PageRequest,
    ) -> Result<Page<User>, TaskhubError> {
        let q = q.map(str::trim).filter(|q| !q.is_empty());
        self.users.list(q, sort, page.clamped()).await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, username: &str) -> Result<UserWithRoles, TaskhubError> {
        let user = find_user(&self.users, username).await?;
        let roles = self.users.role_names(user.id).await?;
        Ok(UserWithRoles { user, roles })
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub team_id: Option<TeamId>,
    pub roles: Vec<String>,
}

pub struct CreateUserUseCase<U: UserRepository, R: RoleRepository, T: TeamRepository> {
    pub users: U,
    pub roles: R,
    pub teams: T,
}

impl<U, R, T> CreateUserUseCase<U, R, T>
where
    U: UserRepository,
    R: RoleRepository,
    T: TeamRepository,
{
    /// Admin is never granted here and unknown role names are ignored.
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, TaskhubError> {
        let username = required(&input.username, "Username is required")?;
        let email = required(&input.email, "Email is required")?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(TaskhubError::Conflict(format!(
                "Username {username} is already taken"
            )));
        }
        ensure_team(&self.teams, input.team_id).await?;

        let names: Vec<String> = normalized_role_names(&input.roles)
            .into_iter()
            .filter(|n| !is_admin_name(n))
            .collect();
        let role_ids: Vec<RoleId> = if names.is_empty() {
            Vec::new()
        } else {
            self.roles
                .find_by_normalized_names(&names)
                .await?
                .into_iter()
                .map(|r| r.id)
                .collect()
        };

        let now = Utc::now();
        let user = User {
            id: UserId(Uuid::now_v7()),
            normalized_username: normalize_name(&username),
            username,
            email,
            full_name: input.full_name.trim().to_owned(),
            phone_number: input.phone_number.filter(|p| !p.trim().is_empty()),
            team_id: input.team_id,
            lockout_enabled: true,
            lockout_end: None,
            access_failed_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user, &role_ids).await?;
        tracing::info!(user_id = %user.id, roles = role_ids.len(), "user created");
        Ok(user)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserInput {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub team_id: Option<TeamId>,
    pub roles: Vec<String>,
}

pub struct UpdateUserUseCase<U, R, T, A>
where
    U: UserRepository,
    R: RoleRepository,
    T: TeamRepository,
    A: RoleAssignmentRepository,
{
    pub users: U,
    pub roles: R,
    pub teams: T,
    pub assign: AssignRolesToUserUseCase<A>,
}

impl<U, R, T, A> UpdateUserUseCase<U, R, T, A>
where
    U: UserRepository,
    R: RoleRepository,
    T: TeamRepository,
    A: RoleAssignmentRepository,
{
    /// Update the profile, then reconcile role membership from role names.
    pub async fn execute(
        &self,
        username: &str,
        input: UpdateUserInput,
    ) -> Result<AssignmentOutcome, TaskhubError> {
        let user = find_user(&self.users, username).await?;
        if normalize_name(&input.username) != user.normalized_username {
            return Err(TaskhubError::validation("Username cannot be changed."));
        }
        let email = required(&input.email, "Email is required")?;
        ensure_team(&self.teams, input.team_id).await?;

        self.users
            .update_profile(
                user.id,
                &UserProfile {
                    email,
                    full_name: input.full_name.trim().to_owned(),
                    phone_number: input.phone_number.filter(|p| !p.trim().is_empty()),
                    team_id: input.team_id,
                },
            )
            .await?;

        let names = normalized_role_names(&input.roles);
        let role_ids: Vec<RoleId> = if names.is_empty() {
            Vec::new()
        } else {
            self.roles
                .find_by_normalized_names(&names)
                .await?
                .into_iter()
                .map(|r| r.id)
                .collect()
        };
        self.assign.execute(user.id, role_ids).await
    }
}

// ── DeactivateUser / ReactivateUser ──────────────────────────────────────────

pub struct DeactivateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeactivateUserUseCase<U> {
    pub async fn execute(&self, username: &str) -> Result<&'static str, TaskhubError> {
        let user = find_user(&self.users, username).await?;
        let roles = self.users.role_names(user.id).await?;
        if roles.iter().any(|r| is_admin_name(r)) {
            return Err(TaskhubError::forbidden_operation("Can not deactivate Admin user"));
        }
        self.users
            .set_lockout(
                user.id,
                Lockout {
                    enabled: true,
                    end: Some(permanent_lockout_end()),
                    reset_failed_count: false,
                },
            )
            .await?;
        tracing::info!(user_id = %user.id, "user locked");
        Ok(LOCKED)
    }
}

pub struct ReactivateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ReactivateUserUseCase<U> {
    pub async fn execute(&self, username: &str) -> Result<&'static str, TaskhubError> {
        let user = find_user(&self.users, username).await?;
        self.users
            .set_lockout(
                user.id,
                Lockout {
                    enabled: true,
                    end: None,
                    reset_failed_count: true,
                },
            )
            .await?;
        tracing::info!(user_id = %user.id, "user lockout released");
        Ok(RELEASED)
    }
}
