use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskhub_auth_types::identity::IdentityHeaders;
use taskhub_core::envelope::Envelope;
use taskhub_domain::id::{TaskId, TeamId, UserId};
use taskhub_domain::pagination::{Page, PageRequest};
use taskhub_domain::role::SystemRole;
use taskhub_domain::sort::{Sort, SortOrder};
use taskhub_domain::task::TaskStatus;

use crate::domain::types::{Task, TaskDraft, TaskFilter, TaskSortField};
use crate::error::TaskhubError;
use crate::handlers::{parse_query, require_any};
use crate::state::AppState;
use crate::usecase::task::{
    CreateTaskUseCase, DeleteTaskUseCase, GetTaskUseCase, ListTasksUseCase,
    UpdateTaskStatusUseCase, UpdateTaskUseCase,
};

const READERS: &[SystemRole] = &[SystemRole::Admin, SystemRole::Manager, SystemRole::Employee];
const MANAGERS: &[SystemRole] = &[SystemRole::Manager];
const ASSIGNEES: &[SystemRole] = &[SystemRole::Employee];

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(serialize_with = "taskhub_core::serde::to_rfc3339_ms_opt")]
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<UserId>,
    pub created_by: UserId,
    pub team_id: Option<TeamId>,
    #[serde(serialize_with = "taskhub_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "taskhub_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            assigned_to: task.assigned_to,
            created_by: task.created_by,
            team_id: task.team_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub team_id: Option<i64>,
    /// `YYYY-MM-DD`
    pub due_date: Option<String>,
    pub sort: Option<TaskSortField>,
    pub order: Option<SortOrder>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl TaskListQuery {
    fn into_parts(
        self,
    ) -> Result<(TaskFilter, Sort<TaskSortField>, PageRequest), TaskhubError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<TaskStatus>)
            .transpose()
            .map_err(|e| TaskhubError::validation(e.to_string()))?;
        let due_date = self
            .due_date
            .as_deref()
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()
            .map_err(|_| TaskhubError::validation("due-date must be YYYY-MM-DD"))?;
        let defaults = PageRequest::default();
        Ok((
            TaskFilter {
                status,
                assigned_to: self.assigned_to.map(UserId),
                team_id: self.team_id.map(TeamId),
                due_date,
            },
            Sort::resolve(self.sort, self.order),
            PageRequest {
                per_page: self.per_page.unwrap_or(defaults.per_page),
                page: self.page.unwrap_or(defaults.page),
            },
        ))
    }
}

#[derive(Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
    pub team_id: Option<i64>,
}

impl From<TaskRequest> for TaskDraft {
    fn from(body: TaskRequest) -> Self {
        Self {
            title: body.title,
            description: body.description,
            status: body.status,
            due_date: body.due_date,
            assigned_to: body.assigned_to.map(UserId),
            team_id: body.team_id.map(TeamId),
        }
    }
}

#[derive(Deserialize)]
pub struct TaskStatusRequest {
    pub status: TaskStatus,
}

// ── GET /api/tasks ───────────────────────────────────────────────────────────

pub async fn list_tasks(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Envelope<Page<TaskResponse>>, TaskhubError> {
    require_any(&identity, READERS)?;
    let query: TaskListQuery = parse_query(raw_query)?;
    let (filter, sort, page) = query.into_parts()?;
    let usecase = ListTasksUseCase {
        tasks: state.task_repo(),
    };
    let tasks = usecase.execute(&filter, sort, page).await?;
    Ok(Envelope::ok("Tasks retrieved", tasks.map(TaskResponse::from)))
}

// ── GET /api/tasks/{id} ──────────────────────────────────────────────────────

pub async fn get_task(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Envelope<TaskResponse>, TaskhubError> {
    require_any(&identity, READERS)?;
    let usecase = GetTaskUseCase {
        tasks: state.task_repo(),
    };
    let task = usecase.execute(TaskId(id)).await?;
    Ok(Envelope::ok("Task retrieved", task.into()))
}

// ── POST /api/tasks ──────────────────────────────────────────────────────────

pub async fn create_task(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<TaskRequest>,
) -> Result<Envelope<TaskResponse>, TaskhubError> {
    require_any(&identity, MANAGERS)?;
    let usecase = CreateTaskUseCase {
        tasks: state.task_repo(),
        users: state.user_repo(),
        teams: state.team_repo(),
    };
    let task = usecase.execute(identity.user_id, body.into()).await?;
    Ok(Envelope::created("Task created", task.into()))
}

// ── PUT /api/tasks/{id} ──────────────────────────────────────────────────────

pub async fn update_task(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TaskRequest>,
) -> Result<Envelope<bool>, TaskhubError> {
    require_any(&identity, MANAGERS)?;
    let usecase = UpdateTaskUseCase {
        tasks: state.task_repo(),
        users: state.user_repo(),
        teams: state.team_repo(),
    };
    usecase.execute(TaskId(id), body.into()).await?;
    Ok(Envelope::ok("Task updated", true))
}

// ── PUT /api/tasks/{id}/status ───────────────────────────────────────────────

pub async fn update_task_status(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TaskStatusRequest>,
) -> Result<Envelope<TaskStatus>, TaskhubError> {
    require_any(&identity, ASSIGNEES)?;
    let usecase = UpdateTaskStatusUseCase {
        tasks: state.task_repo(),
    };
    usecase
        .execute(identity.user_id, TaskId(id), body.status)
        .await?;
    Ok(Envelope::ok("Task status updated", body.status))
}

// ── DELETE /api/tasks/{id} ───────────────────────────────────────────────────

pub async fn delete_task(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Envelope<bool>, TaskhubError> {
    require_any(&identity, MANAGERS)?;
    let usecase = DeleteTaskUseCase {
        tasks: state.task_repo(),
    };
    usecase.execute(TaskId(id)).await?;
    Ok(Envelope::ok("Task deleted", true))
}
