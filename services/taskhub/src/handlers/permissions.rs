use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use taskhub_auth_types::identity::IdentityHeaders;
use taskhub_core::envelope::Envelope;
use taskhub_domain::id::{RoleId, UserId};
use taskhub_domain::role::SystemRole;

use crate::domain::types::RoleMember;
use crate::error::TaskhubError;
use crate::handlers::{AssignmentSummary, require_any};
use crate::state::AppState;
use crate::usecase::role::GetUsersInRoleUseCase;
use crate::usecase::role_assignment::{
    AssignRolesToUserUseCase, AssignUserToRoleUseCase, AssignUsersToRoleUseCase,
};

const ADMIN_ONLY: &[SystemRole] = &[SystemRole::Admin];

pub const SEEDING_IN_BACKGROUND: &str = "Seeding data in background.";

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<RoleMember> for MemberResponse {
    fn from(member: RoleMember) -> Self {
        Self {
            id: member.id,
            username: member.username,
            email: member.email,
        }
    }
}

// ── GET /api/permissions/roles/{role_id}/users ───────────────────────────────

pub async fn get_users_in_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<Envelope<Vec<MemberResponse>>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = GetUsersInRoleUseCase {
        repo: state.role_repo(),
    };
    let members = usecase.execute(RoleId(role_id)).await?;
    Ok(Envelope::ok(
        "Users in role retrieved",
        members.into_iter().map(MemberResponse::from).collect(),
    ))
}

// ── POST /api/permissions/roles/{role_id}/users ──────────────────────────────

/// Body: the complete list of user ids that should hold the role.
pub async fn assign_users_to_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Json(user_ids): Json<Vec<Uuid>>,
) -> Result<Envelope<AssignmentSummary>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = AssignUsersToRoleUseCase {
        repo: state.assignment_repo(),
    };
    let outcome = usecase
        .execute(RoleId(role_id), user_ids.into_iter().map(UserId))
        .await?;
    Ok(Envelope::ok(outcome.message.clone(), AssignmentSummary::from(&outcome)))
}

// ── POST /api/permissions/roles/{role_id}/users/{user_id} ────────────────────

pub async fn assign_user_to_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((role_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Envelope<AssignmentSummary>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = AssignUserToRoleUseCase {
        repo: state.assignment_repo(),
    };
    let outcome = usecase.execute(RoleId(role_id), UserId(user_id)).await?;
    Ok(Envelope::ok(outcome.message.clone(), AssignmentSummary::from(&outcome)))
}

// ── POST /api/permissions/users/{user_id} ────────────────────────────────────

/// Body: the complete list of role ids the user should hold.
pub async fn assign_roles_to_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(role_ids): Json<Vec<Uuid>>,
) -> Result<Envelope<AssignmentSummary>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let usecase = AssignRolesToUserUseCase {
        repo: state.assignment_repo(),
        admin: state.admin_role,
    };
    let outcome = usecase
        .execute(UserId(user_id), role_ids.into_iter().map(RoleId))
        .await?;
    let summary = AssignmentSummary::from(&outcome);
    Ok(Envelope::ok(outcome.message, summary).with_advisories(outcome.advisories))
}

// ── POST /api/permissions/seed-data ──────────────────────────────────────────

/// Re-run admin seeding on a background task and answer immediately.
pub async fn seed_data(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Envelope<bool>, TaskhubError> {
    require_any(&identity, ADMIN_ONLY)?;
    let seeder = state.seeder();
    let account = state.admin_account.clone();
    tokio::spawn(async move {
        match seeder.seed_admin(&account).await {
            Ok(admin) => info!(admin_role_id = %admin.id, "background seeding finished"),
            Err(e) => error!(error = ?e, "background seeding failed"),
        }
    });
    Ok(Envelope::ok(SEEDING_IN_BACKGROUND, true))
}
