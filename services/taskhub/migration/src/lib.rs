use sea_orm_migration::prelude::*;

mod m20250901_000001_create_roles;
mod m20250901_000002_create_teams;
mod m20250901_000003_create_users;
mod m20250901_000004_create_user_roles;
mod m20250901_000005_create_task_items;
mod m20250901_000006_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_roles::Migration),
            Box::new(m20250901_000002_create_teams::Migration),
            Box::new(m20250901_000003_create_users::Migration),
            Box::new(m20250901_000004_create_user_roles::Migration),
            Box::new(m20250901_000005_create_task_items::Migration),
            Box::new(m20250901_000006_add_lookup_indexes::Migration),
        ]
    }
}
