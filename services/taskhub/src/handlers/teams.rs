use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskhub_auth_types::identity::IdentityHeaders;
use taskhub_core::envelope::Envelope;
use taskhub_domain::id::{TeamId, UserId};
use taskhub_domain::pagination::{Page, PageRequest};
use taskhub_domain::sort::{Sort, SortOrder};

use crate::domain::types::{Team, TeamSortField};
use crate::error::TaskhubError;
use crate::handlers::parse_query;
use crate::state::AppState;
use crate::usecase::team::{
    ASSIGNED, AssignUsersToTeamUseCase, CreateTeamUseCase, DeleteTeamUseCase, GetTeamUseCase,
    ListTeamsUseCase, TeamInput, UpdateTeamUseCase,
};

// Team reads are public; writes only require an authenticated caller.

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: TeamId,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "taskhub_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "taskhub_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            description: team.description,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct TeamListQuery {
    pub sort: Option<TeamSortField>,
    pub order: Option<SortOrder>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Deserialize)]
pub struct TeamRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

impl From<TeamRequest> for TeamInput {
    fn from(body: TeamRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

// ── GET /api/teams ───────────────────────────────────────────────────────────

pub async fn list_teams(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Envelope<Page<TeamResponse>>, TaskhubError> {
    let query: TeamListQuery = parse_query(raw_query)?;
    let defaults = PageRequest::default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(defaults.per_page),
        page: query.page.unwrap_or(defaults.page),
    };
    let usecase = ListTeamsUseCase {
        teams: state.team_repo(),
    };
    let teams = usecase
        .execute(Sort::resolve(query.sort, query.order), page)
        .await?;
    Ok(Envelope::ok("Teams retrieved", teams.map(TeamResponse::from)))
}

// ── GET /api/teams/{id} ──────────────────────────────────────────────────────

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Envelope<TeamResponse>, TaskhubError> {
    let usecase = GetTeamUseCase {
        teams: state.team_repo(),
    };
    let team = usecase.execute(TeamId(id)).await?;
    Ok(Envelope::ok("Team retrieved", team.into()))
}

// ── POST /api/teams ──────────────────────────────────────────────────────────

pub async fn create_team(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<TeamRequest>,
) -> Result<Envelope<TeamResponse>, TaskhubError> {
    let usecase = CreateTeamUseCase {
        teams: state.team_repo(),
    };
    let team = usecase.execute(body.into()).await?;
    Ok(Envelope::created("Team created", team.into()))
}

// ── PUT /api/teams/{id} ──────────────────────────────────────────────────────

pub async fn update_team(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TeamRequest>,
) -> Result<Envelope<bool>, TaskhubError> {
    let usecase = UpdateTeamUseCase {
        teams: state.team_repo(),
    };
    usecase.execute(TeamId(id), body.into()).await?;
    Ok(Envelope::ok("Team updated", true))
}

// ── DELETE /api/teams/{id} ───────────────────────────────────────────────────

pub async fn delete_team(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Envelope<bool>, TaskhubError> {
    let usecase = DeleteTeamUseCase {
        teams: state.team_repo(),
    };
    usecase.execute(TeamId(id)).await?;
    Ok(Envelope::ok("Team deleted", true))
}

// ── POST /api/teams/{id}/users ───────────────────────────────────────────────

pub async fn assign_users_to_team(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(user_ids): Json<Vec<Uuid>>,
) -> Result<Envelope<u64>, TaskhubError> {
    let usecase = AssignUsersToTeamUseCase {
        teams: state.team_repo(),
    };
    let user_ids: Vec<UserId> = user_ids.into_iter().map(UserId).collect();
    let moved = usecase.execute(TeamId(id), &user_ids).await?;
    Ok(Envelope::ok(ASSIGNED, moved))
}
