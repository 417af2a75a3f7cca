use taskhub_domain::id::{TeamId, UserId};
use taskhub_domain::pagination::{Page, PageRequest};
use taskhub_domain::sort::Sort;

use crate::domain::repository::TeamRepository;
use crate::domain::types::{Team, TeamDraft, TeamSortField};
use crate::error::TaskhubError;

pub const ASSIGNED: &str = "Assigned successfully.";

pub struct TeamInput {
    pub name: String,
    pub description: Option<String>,
}

fn draft(input: TeamInput, description_required: bool) -> Result<TeamDraft, TaskhubError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(TaskhubError::validation("Team name is required"));
    }
    let description = input
        .description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty());
    if description_required && description.is_none() {
        return Err(TaskhubError::validation("Description is required"));
    }
    Ok(TeamDraft {
        name: name.to_owned(),
        description,
    })
}

async fn find_team<T: TeamRepository>(teams: &T, id: TeamId) -> Result<Team, TaskhubError> {
    teams.find_by_id(id).await?.ok_or(TaskhubError::TeamNotFound)
}

// ── ListTeams / GetTeam ──────────────────────────────────────────────────────

pub struct ListTeamsUseCase<T: TeamRepository> {
    pub teams: T,
}

impl<T: TeamRepository> ListTeamsUseCase<T> {
    pub async fn execute(
        &self,
        sort: Sort<TeamSortField>,
        page: PageRequest,
    ) -> Result<Page<Team>, TaskhubError> {
        self.teams.list(sort, page.clamped()).await
    }
}

pub struct GetTeamUseCase<T: TeamRepository> {
    pub teams: T,
}

impl<T: TeamRepository> GetTeamUseCase<T> {
    pub async fn execute(&self, id: TeamId) -> Result<Team, TaskhubError> {
        find_team(&self.teams, id).await
    }
}

// ── CreateTeam / UpdateTeam / DeleteTeam ─────────────────────────────────────

pub struct CreateTeamUseCase<T: TeamRepository> {
    pub teams: T,
}

impl<T: TeamRepository> CreateTeamUseCase<T> {
    pub async fn execute(&self, input: TeamInput) -> Result<Team, TaskhubError> {
        let draft = draft(input, false)?;
        self.teams.create(&draft).await
    }
}

pub struct UpdateTeamUseCase<T: TeamRepository> {
    pub teams: T,
}

impl<T: TeamRepository> UpdateTeamUseCase<T> {
    pub async fn execute(&self, id: TeamId, input: TeamInput) -> Result<(), TaskhubError> {
        find_team(&self.teams, id).await?;
        let draft = draft(input, true)?;
        self.teams.update(id, &draft).await
    }
}

pub struct DeleteTeamUseCase<T: TeamRepository> {
    pub teams: T,
}

impl<T: TeamRepository> DeleteTeamUseCase<T> {
    pub async fn execute(&self, id: TeamId) -> Result<(), TaskhubError> {
        find_team(&self.teams, id).await?;
        self.teams.delete(id).await
    }
}

// ── AssignUsersToTeam ────────────────────────────────────────────────────────

pub struct AssignUsersToTeamUseCase<T: TeamRepository> {
    pub teams: T,
}

impl<T: TeamRepository> AssignUsersToTeamUseCase<T> {
    /// Returns the number of users moved into the team. Unknown ids are skipped.
    pub async fn execute(&self, id: TeamId, user_ids: &[UserId]) -> Result<u64, TaskhubError> {
        if user_ids.is_empty() {
            return Err(TaskhubError::validation("User list must not be empty"));
        }
        find_team(&self.teams, id).await?;
        let moved = self.teams.assign_users(id, user_ids).await?;
        tracing::info!(team_id = %id, moved, "users assigned to team");
        Ok(moved)
    }
}
