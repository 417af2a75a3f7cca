use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use taskhub_core::health::healthz;
use taskhub_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    health::readyz,
    permissions::{
        assign_roles_to_user, assign_user_to_role, assign_users_to_role, get_users_in_role,
        seed_data,
    },
    roles::{create_role, delete_role, get_role, list_roles, update_role},
    tasks::{create_task, delete_task, get_task, list_tasks, update_task, update_task_status},
    teams::{assign_users_to_team, create_team, delete_team, get_team, list_teams, update_team},
    users::{activate_user, create_user, deactivate_user, get_user, list_users, update_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Roles
        .route("/roles", get(list_roles).post(create_role))
        .route(
            "/roles/{role_id}",
            get(get_role).put(update_role).delete(delete_role),
        )
        // Permissions
        .route(
            "/permissions/roles/{role_id}/users",
            get(get_users_in_role).post(assign_users_to_role),
        )
        .route(
            "/permissions/roles/{role_id}/users/{user_id}",
            post(assign_user_to_role),
        )
        .route("/permissions/users/{user_id}", post(assign_roles_to_user))
        .route("/permissions/seed-data", post(seed_data))
        // Users
        .route("/users", get(list_users).post(create_user))
        .route("/users/{username}", get(get_user).put(update_user))
        .route("/users/deactivate/{username}", post(deactivate_user))
        .route("/users/activate/{username}", post(activate_user))
        // Teams
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/teams/{id}/users", post(assign_users_to_team))
        // Tasks
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/status", put(update_task_status));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api", api)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
