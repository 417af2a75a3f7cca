use taskhub_domain::id::{TaskId, TeamId, UserId};
use taskhub_domain::pagination::{Page, PageRequest};
use taskhub_domain::sort::Sort;
use taskhub_domain::task::TaskStatus;

use crate::domain::repository::{TaskRepository, TeamRepository, UserRepository};
use crate::domain::types::{Task, TaskDraft, TaskFilter, TaskSortField};
use crate::error::TaskhubError;

fn validate(draft: TaskDraft) -> Result<TaskDraft, TaskhubError> {
    let title = draft.title.trim().to_owned();
    if title.is_empty() {
        return Err(TaskhubError::validation("Title is required"));
    }
    let description = draft.description.trim().to_owned();
    if description.is_empty() {
        return Err(TaskhubError::validation("Description is required"));
    }
    Ok(TaskDraft {
        title,
        description,
        ..draft
    })
}

async fn ensure_references<U, T>(
    users: &U,
    teams: &T,
    assigned_to: Option<UserId>,
    team_id: Option<TeamId>,
) -> Result<(), TaskhubError>
where
    U: UserRepository,
    T: TeamRepository,
{
    if let Some(user_id) = assigned_to {
        users
            .find_by_id(user_id)
            .await?
            .ok_or(TaskhubError::UserNotFound)?;
    }
    if let Some(team_id) = team_id {
        teams
            .find_by_id(team_id)
            .await?
            .ok_or(TaskhubError::TeamNotFound)?;
    }
    Ok(())
}

async fn find_task<R: TaskRepository>(tasks: &R, id: TaskId) -> Result<Task, TaskhubError> {
    tasks.find_by_id(id).await?.ok_or(TaskhubError::TaskNotFound)
}

// ── ListTasks / GetTask ──────────────────────────────────────────────────────

pub struct ListTasksUseCase<R: TaskRepository> {
    pub tasks: R,
}

impl<R: TaskRepository> ListTasksUseCase<R> {
    pub async fn execute(
        &self,
        filter: &TaskFilter,
        sort: Sort<TaskSortField>,
        page: PageRequest,
    ) -> Result<Page<Task>, TaskhubError> {
        self.tasks.list(filter, sort, page.clamped()).await
    }
}

pub struct GetTaskUseCase<R: TaskRepository> {
    pub tasks: R,
}

impl<R: TaskRepository> GetTaskUseCase<R> {
    pub async fn execute(&self, id: TaskId) -> Result<Task, TaskhubError> {
        find_task(&self.tasks, id).await
    }
}

// ── CreateTask / UpdateTask ──────────────────────────────────────────────────

pub struct CreateTaskUseCase<R: TaskRepository, U: UserRepository, T: TeamRepository> {
    pub tasks: R,
    pub users: U,
    pub teams: T,
}

impl<R, U, T> CreateTaskUseCase<R, U, T>
where
    R: TaskRepository,
    U: UserRepository,
    T: TeamRepository,
{
    pub async fn execute(&self, caller: UserId, draft: TaskDraft) -> Result<Task, TaskhubError> {
        let draft = validate(draft)?;
        ensure_references(&self.users, &self.teams, draft.assigned_to, draft.team_id).await?;
        let task = self.tasks.create(&draft, caller).await?;
        tracing::info!(task_id = %task.id, created_by = %caller, "task created");
        Ok(task)
    }
}

pub struct UpdateTaskUseCase<R: TaskRepository, U: UserRepository, T: TeamRepository> {
    pub tasks: R,
    pub users: U,
    pub teams: T,
}

impl<R, U, T> UpdateTaskUseCase<R, U, T>
where
    R: TaskRepository,
    U: UserRepository,
    T: TeamRepository,
{
    pub async fn execute(&self, id: TaskId, draft: TaskDraft) -> Result<(), TaskhubError> {
        find_task(&self.tasks, id).await?;
        let draft = validate(draft)?;
        ensure_references(&self.users, &self.teams, draft.assigned_to, draft.team_id).await?;
        self.tasks.update(id, &draft).await
    }
}

// ── UpdateTaskStatus ─────────────────────────────────────────────────────────

pub struct UpdateTaskStatusUseCase<R: TaskRepository> {
    pub tasks: R,
}

impl<R: TaskRepository> UpdateTaskStatusUseCase<R> {
    /// Only the assignee may move a task; other callers see `TaskNotFound`.
    pub async fn execute(
        &self,
        caller: UserId,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<(), TaskhubError> {
        let task = find_task(&self.tasks, id).await?;
        if task.assigned_to != Some(caller) {
            return Err(TaskhubError::TaskNotFound);
        }
        self.tasks.update_status(id, status).await
    }
}

// ── DeleteTask ───────────────────────────────────────────────────────────────

pub struct DeleteTaskUseCase<R: TaskRepository> {
    pub tasks: R,
}

impl<R: TaskRepository> DeleteTaskUseCase<R> {
    pub async fn execute(&self, id: TaskId) -> Result<(), TaskhubError> {
        find_task(&self.tasks, id).await?;
        self.tasks.delete(id).await
    }
}
