use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskhub_auth_types::identity::IdentityHeaders;
use taskhub_core::envelope::Envelope;
use taskhub_domain::id::{TeamId, UserId};
use taskhub_domain::pagination::{Page, PageRequest};
use taskhub_domain::role::SystemRole;
use taskhub_domain::sort::{Sort, SortOrder};

use crate::domain::types::{User, UserSortField};
use crate::error::TaskhubError;
use crate::handlers::{AssignmentSummary, parse_query, require_any};
use crate::state::AppState;
use crate::usecase::role_assignment::AssignRolesToUserUseCase;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeactivateUserUseCase, GetUserUseCase, ListUsersUseCase,
    ReactivateUserUseCase, UpdateUserInput, UpdateUserUseCase,
};

const ADMIN_ONLY: &[SystemRole] = &[SystemRole::Admin];

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub team_id: Option<TeamId>,
    pub is_locked: bool,
    #[serde(serialize_with = "taskhub_core::serde::to_rfc3339_ms_opt")]
    pub lockout_end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(serialize_with = "taskhub_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "taskhub_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    fn new(user: User, roles: Option<Vec<String>>) -> Self {
        Self {
            is_locked: user.is_locked(Utc::now()),
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            phone_number: user.phone_number,
            team_id: user.team_id,
            lockout_end: user.lockout_end,
            roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct UserListQuery {
    pub q: Option<String>,
    pub sort: Option<UserSortField>,
    pub order: Option<SortOrder>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub phone_number: Option<String>,
    pub team_id: Option<i64>,
    #[serde(default)]
    pub roles: Vec<String>,
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Envelope<Page<UserResponse>>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let query: UserListQuery = parse_query(raw_query)?;
    let defaults = PageRequest::default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(defaults.per_page),
        page: query.page.unwrap_or(defaults.page),
    };
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let sort = Sort::resolve(query.sort, query.order);
    let users = usecase.execute(query.q.as_deref(), sort, page).await?;
    Ok(Envelope::ok(
        "Users retrieved",
        users.map(|u| UserResponse::new(u, None)),
    ))
}

// ── GET /api/users/{username} ────────────────────────────────────────────────

pub async fn get_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Envelope<UserResponse>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let found = usecase.execute(&username).await?;
    Ok(Envelope::ok(
        "User retrieved",
        UserResponse::new(found.user, Some(found.roles)),
    ))
}

// ── POST /api/users ──────────────────────────────────────────────────────────

pub async fn create_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<UserRequest>,
) -> Result<Envelope<UserResponse>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = CreateUserUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        teams: state.team_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            username: body.username,
            email: body.email,
            full_name: body.full_name,
            phone_number: body.phone_number,
            team_id: body.team_id.map(TeamId),
            roles: body.roles,
        })
        .await?;
    Ok(Envelope::created("User created", UserResponse::new(user, None)))
}

// ── PUT /api/users/{username} ────────────────────────────────────────────────

pub async fn update_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<UserRequest>,
) -> Result<Envelope<AssignmentSummary>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        teams: state.team_repo(),
        assign: AssignRolesToUserUseCase {
            repo: state.assignment_repo(),
            admin: state.admin_role,
        },
    };
    let outcome = usecase
        .execute(
            &username,
            UpdateUserInput {
                username: body.username,
                email: body.email,
                full_name: body.full_name,
                phone_number: body.phone_number,
                team_id: body.team_id.map(TeamId),
                roles: body.roles,
            },
        )
        .await?;
    let summary = AssignmentSummary::from(&outcome);
    Ok(Envelope::ok("User updated", summary).with_advisories(outcome.advisories))
}

// ── POST /api/users/deactivate/{username} ────────────────────────────────────

pub async fn deactivate_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Envelope<bool>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = DeactivateUserUseCase {
        users: state.user_repo(),
    };
    let message = usecase.execute(&username).await?;
    Ok(Envelope::ok(message, true))
}

// ── POST /api/users/activate/{username} ──────────────────────────────────────

pub async fn activate_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Envelope<bool>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = ReactivateUserUseCase {
        users: state.user_repo(),
    };
    let message = usecase.execute(&username).await?;
    Ok(Envelope::ok(message, true))
}
