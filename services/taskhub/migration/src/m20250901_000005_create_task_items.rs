use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TaskItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TaskItems::Title).string_len(512).not_null())
                    .col(ColumnDef::new(TaskItems::Description).text().not_null())
                    .col(
                        ColumnDef::new(TaskItems::Status)
                            .string_len(32)
                            .not_null()
                            .default("todo"),
                    )
                    .col(
                        ColumnDef::new(TaskItems::DueDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(TaskItems::AssignedTo).uuid().null())
                    .col(ColumnDef::new(TaskItems::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(TaskItems::TeamId).big_integer().null())
                    .col(
                        ColumnDef::new(TaskItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TaskItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TaskItems::Table, TaskItems::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TaskItems::Table, TaskItems::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TaskItems::Table, TaskItems::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskItems::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TaskItems {
    Table,
    Id,
    Title,
    Description,
    Status,
    DueDate,
    AssignedTo,
    CreatedBy,
    TeamId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Teams {
    Table,
    Id,
}
