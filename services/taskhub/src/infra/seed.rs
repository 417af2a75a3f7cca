//! Startup seeding of the built-in roles and accounts.

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use taskhub_domain::id::{RoleId, UserId};
use taskhub_domain::role::{SystemRole, normalize_name};

use crate::config::{SeedAccount, TaskhubConfig};
use crate::domain::repository::{RoleAssignmentRepository, RoleRepository, UserRepository};
use crate::domain::types::{AdminRole, Assignment, AssignmentDelta, Role, User};
use crate::error::TaskhubError;

pub struct Seeder<R, U, A>
where
    R: RoleRepository,
    U: UserRepository,
    A: RoleAssignmentRepository,
{
    pub roles: R,
    pub users: U,
    pub assignments: A,
}

impl<R, U, A> Seeder<R, U, A>
where
    R: RoleRepository,
    U: UserRepository,
    A: RoleAssignmentRepository,
{
    /// Resolve the Admin role, creating it if missing. When seeding is
    /// enabled, also ensure every built-in role and account exists. Failures
    /// other than resolving Admin are logged and skipped.
    pub async fn run(&self, config: &TaskhubConfig) -> Result<AdminRole, TaskhubError> {
        let admin = self.ensure_role(SystemRole::Admin).await?;

        if config.seed_data_on_startup {
            let accounts = [
                (SystemRole::Admin, config.admin_account()),
                (SystemRole::Manager, config.manager_account()),
                (SystemRole::Employee, config.employee_account()),
            ];
            for (role, account) in accounts {
                if let Err(e) = self.seed_account(role, &account).await {
                    error!(error = ?e, role = role.name(), "seeding failed");
                }
            }
        }

        Ok(AdminRole { id: admin.id })
    }

    /// Ensure the Admin role, the admin account and its assignment exist.
    pub async fn seed_admin(&self, account: &SeedAccount) -> Result<AdminRole, TaskhubError> {
        let admin = self.seed_account(SystemRole::Admin, account).await?;
        Ok(AdminRole { id: admin.id })
    }

    async fn seed_account(
        &self,
        role: SystemRole,
        account: &SeedAccount,
    ) -> Result<Role, TaskhubError> {
        let role = self.ensure_role(role).await?;
        self.ensure_account(account, &role).await?;
        Ok(role)
    }

    pub async fn ensure_role(&self, role: SystemRole) -> Result<Role, TaskhubError> {
        if let Some(existing) = self
            .roles
            .find_by_normalized_name(role.normalized_name())
            .await?
        {
            return Ok(existing);
        }
        let created = Role {
            id: RoleId(Uuid::now_v7()),
            name: role.name().to_owned(),
            normalized_name: role.normalized_name().to_owned(),
        };
        self.roles.create(&created).await?;
        info!(role = role.name(), "seeded role");
        Ok(created)
    }

    pub async fn ensure_account(
        &self,
        account: &SeedAccount,
        role: &Role,
    ) -> Result<User, TaskhubError> {
        let user = match self.users.find_by_username(&account.username).await? {
            Some(user) => user,
            None => {
                let now = Utc::now();
                let user = User {
                    id: UserId(Uuid::now_v7()),
                    username: account.username.clone(),
                    normalized_username: normalize_name(&account.username),
                    email: account.email.clone(),
                    full_name: account.username.clone(),
                    phone_number: account.phone_number.clone(),
                    team_id: None,
                    lockout_enabled: true,
                    lockout_end: None,
                    access_failed_count: 0,
                    created_at: now,
                    updated_at: now,
                };
                self.users.create(&user, &[]).await?;
                info!(username = %user.username, "seeded user");
                user
            }
        };

        if !self.assignments.assignment_exists(user.id, role.id).await? {
            self.assignments
                .apply(&AssignmentDelta {
                    remove: Vec::new(),
                    add: vec![Assignment {
                        user_id: user.id,
                        role_id: role.id,
                    }],
                })
                .await?;
            info!(username = %user.username, role = %role.name, "seeded role assignment");
        }
        Ok(user)
    }
}
