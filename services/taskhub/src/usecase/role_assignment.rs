//! Bulk reconciliation of the `user_roles` join table.
//!
//! Every entry point reads the current membership, diffs it against the
//! desired set and writes the delta in a single transaction. The Admin role
//! is never gained or lost through these operations.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::info;

use taskhub_domain::id::{RoleId, UserId};
use taskhub_domain::role::is_admin_name;

use crate::domain::repository::RoleAssignmentRepository;
use crate::domain::types::{AdminRole, Assignment, AssignmentDelta, AssignmentOutcome, Role};
use crate::error::TaskhubError;

pub const USERS_ASSIGNED: &str = "Users assigned to role";
pub const ROLES_ASSIGNED: &str = "Roles assigned to user";
pub const CANNOT_UNASSIGN_ADMIN: &str = "Can not unassign user from Admin role";
pub const CANNOT_ASSIGN_ADMIN: &str = "Can not assign user to Admin role";
pub const CANNOT_ASSIGN_USERS_TO_ADMIN: &str = "Can not assign users to Admin role";

/// `(current - desired, desired - current)`, each sorted.
pub fn set_delta<T>(current: &HashSet<T>, desired: &HashSet<T>) -> (Vec<T>, Vec<T>)
where
    T: Copy + Eq + Hash + Ord,
{
    let mut remove: Vec<T> = current.difference(desired).copied().collect();
    let mut add: Vec<T> = desired.difference(current).copied().collect();
    remove.sort_unstable();
    add.sort_unstable();
    (remove, add)
}

async fn assignable_role<R: RoleAssignmentRepository>(
    repo: &R,
    role_id: RoleId,
) -> Result<Role, TaskhubError> {
    let role = repo
        .find_role(role_id)
        .await?
        .ok_or(TaskhubError::RoleNotFound)?;
    if is_admin_name(&role.normalized_name) {
        return Err(TaskhubError::forbidden_operation(CANNOT_ASSIGN_USERS_TO_ADMIN));
    }
    Ok(role)
}

async fn commit<R: RoleAssignmentRepository>(
    repo: &R,
    delta: &AssignmentDelta,
) -> Result<(), TaskhubError> {
    if delta.is_empty() {
        return Ok(());
    }
    repo.apply(delta).await
}

// ── AssignUsersToRole ────────────────────────────────────────────────────────

pub struct AssignUsersToRoleUseCase<R: RoleAssignmentRepository> {
    pub repo: R,
}

impl<R: RoleAssignmentRepository> AssignUsersToRoleUseCase<R> {
    /// Make the members of `role_id` exactly `desired`.
    pub async fn execute(
        &self,
        role_id: RoleId,
        desired: impl IntoIterator<Item = UserId>,
    ) -> Result<AssignmentOutcome, TaskhubError> {
        assignable_role(&self.repo, role_id).await?;

        let desired: HashSet<UserId> = desired.into_iter().collect();
        let current = self.repo.user_ids_in_role(role_id).await?;
        let (to_remove, to_add) = set_delta(&current, &desired);

        let mut delta = AssignmentDelta {
            remove: to_remove
                .into_iter()
                .map(|user_id| Assignment { user_id, role_id })
                .collect(),
            add: Vec::with_capacity(to_add.len()),
        };
        for user_id in to_add {
            if !self.repo.assignment_exists(user_id, role_id).await? {
                delta.add.push(Assignment { user_id, role_id });
            }
        }

        commit(&self.repo, &delta).await?;
        info!(
            %role_id,
            removed = delta.remove.len(),
            added = delta.add.len(),
            "users assigned to role"
        );
        Ok(AssignmentOutcome {
            message: USERS_ASSIGNED.to_owned(),
            advisories: Vec::new(),
            removed: delta.remove.len(),
            added: delta.add.len(),
        })
    }
}

// ── AssignUserToRole ─────────────────────────────────────────────────────────

pub struct AssignUserToRoleUseCase<R: RoleAssignmentRepository> {
    pub repo: R,
}

impl<R: RoleAssignmentRepository> AssignUserToRoleUseCase<R> {
    /// Add a single member. Succeeds without writing when already assigned.
    pub async fn execute(
        &self,
        role_id: RoleId,
        user_id: UserId,
    ) -> Result<AssignmentOutcome, TaskhubError> {
        assignable_role(&self.repo, role_id).await?;

        if self.repo.assignment_exists(user_id, role_id).await? {
            return Ok(AssignmentOutcome {
                message: format!("User {user_id} already assigned to role"),
                advisories: Vec::new(),
                removed: 0,
                added: 0,
            });
        }

        let delta = AssignmentDelta {
            remove: Vec::new(),
            add: vec![Assignment { user_id, role_id }],
        };
        commit(&self.repo, &delta).await?;
        info!(%role_id, %user_id, "user assigned to role");
        Ok(AssignmentOutcome {
            message: USERS_ASSIGNED.to_owned(),
            advisories: Vec::new(),
            removed: 0,
            added: 1,
        })
    }
}

// ── AssignRolesToUser ────────────────────────────────────────────────────────

pub struct AssignRolesToUserUseCase<R: RoleAssignmentRepository> {
    pub repo: R,
    pub admin: AdminRole,
}

impl<R: RoleAssignmentRepository> AssignRolesToUserUseCase<R> {
    /// Make the roles of `user_id` exactly `desired`, except that Admin
    /// membership is kept as it is. Any correction is reported as an advisory.
    /// Unknown role ids are skipped.
    pub async fn execute(
        &self,
        user_id: UserId,
        desired: impl IntoIterator<Item = RoleId>,
    ) -> Result<AssignmentOutcome, TaskhubError> {
        if !self.repo.user_exists(user_id).await? {
            return Err(TaskhubError::UserNotFound);
        }

        let current = self.repo.role_ids_of_user(user_id).await?;
        let mut desired: HashSet<RoleId> = desired.into_iter().collect();
        let mut advisories = Vec::new();

        let has_admin = current.contains(&self.admin.id);
        if has_admin && !desired.contains(&self.admin.id) {
            desired.insert(self.admin.id);
            advisories.push(CANNOT_UNASSIGN_ADMIN.to_owned());
        } else if !has_admin && desired.remove(&self.admin.id) {
            advisories.push(CANNOT_ASSIGN_ADMIN.to_owned());
        }

        let (to_remove, to_add) = set_delta(&current, &desired);
        let mut delta = AssignmentDelta {
            remove: to_remove
                .into_iter()
                .map(|role_id| Assignment { user_id, role_id })
                .collect(),
            add: Vec::with_capacity(to_add.len()),
        };
        for role_id in to_add {
            if self.repo.role_exists(role_id).await? {
                delta.add.push(Assignment { user_id, role_id });
            }
        }

        commit(&self.repo, &delta).await?;
        info!(
            %user_id,
            removed = delta.remove.len(),
            added = delta.add.len(),
            advisories = advisories.len(),
            "roles assigned to user"
        );
        Ok(AssignmentOutcome {
            message: ROLES_ASSIGNED.to_owned(),
            advisories,
            removed: delta.remove.len(),
            added: delta.add.len(),
        })
    }
}
