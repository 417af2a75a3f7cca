use uuid::Uuid;

use taskhub_domain::id::RoleId;
use taskhub_domain::role::{is_admin_name, normalize_name};

use crate::domain::repository::RoleRepository;
use crate::domain::types::{Role, RoleMember};
use crate::error::TaskhubError;

const NAME_REQUIRED: &str = "Role name is required";
const NAME_ALPHABET_ONLY: &str = "Role name must contain only English alphabet";

fn valid_role_name(name: &str) -> Result<(), TaskhubError> {
    if name.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(TaskhubError::validation(NAME_ALPHABET_ONLY))
    }
}

fn required_name(name: &str) -> Result<&str, TaskhubError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TaskhubError::validation(NAME_REQUIRED));
    }
    Ok(name)
}

// ── ListRoles ────────────────────────────────────────────────────────────────

pub struct ListRolesUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> ListRolesUseCase<R> {
    pub async fn execute(&self, q: Option<&str>) -> Result<Vec<Role>, TaskhubError> {
        let q = q.map(str::trim).filter(|q| !q.is_empty());
        self.repo.list(q).await
    }
}

// ── GetRole ──────────────────────────────────────────────────────────────────

pub struct GetRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> GetRoleUseCase<R> {
    pub async fn execute(&self, id: RoleId) -> Result<Role, TaskhubError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(TaskhubError::RoleNotFound)
    }
}

// ── CreateRole ───────────────────────────────────────────────────────────────

pub struct CreateRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> CreateRoleUseCase<R> {
    pub async fn execute(&self, name: &str) -> Result<Role, TaskhubError> {
        let name = required_name(name)?;
        if is_admin_name(name) {
            return Err(TaskhubError::forbidden_operation("Can not create Admin role"));
        }
        valid_role_name(name)?;

        let normalized_name = normalize_name(name);
        if self
            .repo
            .find_by_normalized_name(&normalized_name)
            .await?
            .is_some()
        {
            return Err(TaskhubError::Conflict(format!("Role {name} already exists")));
        }

        let role = Role {
            id: RoleId(Uuid::now_v7()),
            name: name.to_owned(),
            normalized_name,
        };
        self.repo.create(&role).await?;
        Ok(role)
    }
}

// ── UpdateRole ───────────────────────────────────────────────────────────────

pub struct UpdateRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> UpdateRoleUseCase<R> {
    pub async fn execute(&self, id: RoleId, name: &str) -> Result<Role, TaskhubError> {
        let name = required_name(name)?;
        if is_admin_name(name) {
            return Err(TaskhubError::forbidden_operation("Can not update to Admin role"));
        }
        let role = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(TaskhubError::RoleNotFound)?;
        if is_admin_name(&role.normalized_name) {
            return Err(TaskhubError::forbidden_operation("Can not update this role"));
        }
        valid_role_name(name)?;

        let normalized_name = normalize_name(name);
        if let Some(existing) = self.repo.find_by_normalized_name(&normalized_name).await? {
            if existing.id != id {
                return Err(TaskhubError::Conflict(format!("Role {name} already exists")));
            }
        }

        self.repo.rename(id, name, &normalized_name).await?;
        Ok(Role {
            id,
            name: name.to_owned(),
            normalized_name,
        })
    }
}

// ── DeleteRole ───────────────────────────────────────────────────────────────

pub struct DeleteRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> DeleteRoleUseCase<R> {
    pub async fn execute(&self, id: RoleId) -> Result<(), TaskhubError> {
        let role = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(TaskhubError::RoleNotFound)?;
        if is_admin_name(&role.normalized_name) {
            return Err(TaskhubError::forbidden_operation("Can not delete this role"));
        }
        self.repo.delete(id).await
    }
}

// ── GetUsersInRole ───────────────────────────────────────────────────────────

pub struct GetUsersInRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> GetUsersInRoleUseCase<R> {
    pub async fn execute(&self, id: RoleId) -> Result<Vec<RoleMember>, TaskhubError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(TaskhubError::RoleNotFound);
        }
        self.repo.members(id).await
    }
}
