use sea_orm::DatabaseConnection;

use crate::config::SeedAccount;
use crate::domain::types::AdminRole;
use crate::infra::db::{
    DbRoleAssignmentRepository, DbRoleRepository, DbTaskRepository, DbTeamRepository,
    DbUserRepository,
};
use crate::infra::seed::Seeder;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub admin_role: AdminRole,
    /// Account re-seeded by `POST /api/permissions/seed-data`.
    pub admin_account: SeedAccount,
}

impl AppState {
    pub fn assignment_repo(&self) -> DbRoleAssignmentRepository {
        DbRoleAssignmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn role_repo(&self) -> DbRoleRepository {
        DbRoleRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn team_repo(&self) -> DbTeamRepository {
        DbTeamRepository {
            db: self.db.clone(),
        }
    }

    pub fn task_repo(&self) -> DbTaskRepository {
        DbTaskRepository {
            db: self.db.clone(),
        }
    }

    pub fn seeder(
        &self,
    ) -> Seeder<DbRoleRepository, DbUserRepository, DbRoleAssignmentRepository> {
        Seeder {
            roles: self.role_repo(),
            users: self.user_repo(),
            assignments: self.assignment_repo(),
        }
    }
}
