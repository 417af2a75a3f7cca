use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use taskhub::config::TaskhubConfig;
use taskhub::infra::db::{DbRoleAssignmentRepository, DbRoleRepository, DbUserRepository};
use taskhub::infra::seed::Seeder;
use taskhub::router::build_router;
use taskhub::state::AppState;
use taskhub_core::config::Config;
use taskhub_core::tracing::init_tracing;
use taskhub_migration::Migrator;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = TaskhubConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    info!("migrations applied");

    let seeder = Seeder {
        roles: DbRoleRepository { db: db.clone() },
        users: DbUserRepository { db: db.clone() },
        assignments: DbRoleAssignmentRepository { db: db.clone() },
    };
    let admin_role = seeder
        .run(&config)
        .await
        .expect("failed to resolve Admin role");
    info!(admin_role_id = %admin_role.id, "admin role resolved");

    let state = AppState {
        db,
        admin_role,
        admin_account: config.admin_account(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.taskhub_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("taskhub service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
