use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskhub_auth_types::identity::IdentityHeaders;
use taskhub_core::envelope::Envelope;
use taskhub_domain::id::RoleId;
use taskhub_domain::role::SystemRole;

use crate::domain::types::Role;
use crate::error::TaskhubError;
use crate::handlers::{parse_query, require_any};
use crate::state::AppState;
use crate::usecase::role::{
    CreateRoleUseCase, DeleteRoleUseCase, GetRoleUseCase, ListRolesUseCase, UpdateRoleUseCase,
};

const ADMIN_ONLY: &[SystemRole] = &[SystemRole::Admin];

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: RoleId,
    pub name: String,
    pub normalized_name: String,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            normalized_name: role.normalized_name,
        }
    }
}

#[derive(Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Default)]
pub struct RoleListQuery {
    pub q: Option<String>,
}

// ── GET /api/roles ───────────────────────────────────────────────────────────

pub async fn list_roles(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Envelope<Vec<RoleResponse>>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let query: RoleListQuery = parse_query(raw_query)?;
    let usecase = ListRolesUseCase {
        repo: state.role_repo(),
    };
    let roles = usecase.execute(query.q.as_deref()).await?;
    Ok(Envelope::ok(
        "Roles retrieved",
        roles.into_iter().map(RoleResponse::from).collect(),
    ))
}

// ── GET /api/roles/{role_id} ─────────────────────────────────────────────────

pub async fn get_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<Envelope<RoleResponse>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = GetRoleUseCase {
        repo: state.role_repo(),
    };
    let role = usecase.execute(RoleId(role_id)).await?;
    Ok(Envelope::ok("Role retrieved", role.into()))
}

// ── POST /api/roles ──────────────────────────────────────────────────────────

pub async fn create_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RoleRequest>,
) -> Result<Envelope<RoleResponse>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = CreateRoleUseCase {
        repo: state.role_repo(),
    };
    let role = usecase.execute(&body.name).await?;
    Ok(Envelope::created("Role created", role.into()))
}

// ── PUT /api/roles/{role_id} ─────────────────────────────────────────────────

pub async fn update_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Json(body): Json<RoleRequest>,
) -> Result<Envelope<RoleResponse>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = UpdateRoleUseCase {
        repo: state.role_repo(),
    };
    let role = usecase.execute(RoleId(role_id), &body.name).await?;
    Ok(Envelope::ok("Role updated", role.into()))
}

// ── DELETE /api/roles/{role_id} ──────────────────────────────────────────────

pub async fn delete_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<Envelope<bool>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = DeleteRoleUseCase {
        repo: state.role_repo(),
    };
    usecase.execute(RoleId(role_id)).await?;
    Ok(Envelope::ok("Role deleted", true))
}
