use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(UserRoles::Table)
                    .col(UserRoles::RoleId)
                    .name("idx_user_roles_role_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Users::Table)
                    .col(Users::TeamId)
                    .name("idx_users_team_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(TaskItems::Table)
                    .col(TaskItems::AssignedTo)
                    .name("idx_task_items_assigned_to")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(TaskItems::Table)
                    .col(TaskItems::TeamId)
                    .name("idx_task_items_team_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_task_items_team_id",
            "idx_task_items_assigned_to",
            "idx_users_team_id",
            "idx_user_roles_role_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum UserRoles {
    Table,
    RoleId,
}

#[derive(Iden)]
enum Users {
    Table,
    TeamId,
}

#[derive(Iden)]
enum TaskItems {
    Table,
    AssignedTo,
    TeamId,
}
