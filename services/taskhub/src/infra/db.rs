use std::collections::HashSet;

use anyhow::Context as _;
use chrono::{Duration, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, DeleteMany, EntityTrait, Insert, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait as _, SqlErr, TransactionError, TransactionTrait,
    sea_query::Expr, sea_query::OnConflict,
};
use uuid::Uuid;

use taskhub_core::sea_ext::{Paged, SearchAny, Sorted};
use taskhub_domain::id::{RoleId, TaskId, TeamId, UserId};
use taskhub_domain::pagination::{Page, PageRequest};
use taskhub_domain::role::normalize_name;
use taskhub_domain::sort::Sort;
use taskhub_domain::task::TaskStatus;
use taskhub_schema::{roles, task_items, teams, user_roles, users};

use crate::domain::repository::{
    RoleAssignmentRepository, RoleRepository, TaskRepository, TeamRepository, UserRepository,
};
use crate::domain::types::{
    Assignment, AssignmentDelta, Lockout, Role, RoleMember, Task, TaskDraft, TaskFilter,
    TaskSortField, Team, TeamDraft, TeamSortField, User, UserProfile, UserSortField,
};
use crate::error::TaskhubError;

// ── Error mapping ────────────────────────────────────────────────────────────

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Unique violations become `Conflict(message)`; everything else is internal.
fn write_error(err: DbErr, what: &'static str, message: impl FnOnce() -> String) -> TaskhubError {
    if is_unique_violation(&err) {
        TaskhubError::Conflict(message())
    } else {
        TaskhubError::Internal(anyhow::Error::new(err).context(what))
    }
}

fn txn_write_error(
    err: TransactionError<DbErr>,
    what: &'static str,
    message: impl FnOnce() -> String,
) -> TaskhubError {
    match err {
        TransactionError::Transaction(err) | TransactionError::Connection(err) => {
            write_error(err, what, message)
        }
    }
}

fn assignment_model(a: &Assignment) -> user_roles::ActiveModel {
    user_roles::ActiveModel {
        user_id: Set(a.user_id.0),
        role_id: Set(a.role_id.0),
    }
}

/// `INSERT ... ON CONFLICT (user_id, role_id) DO NOTHING` for every row.
fn insert_pairs(rows: &[Assignment]) -> Insert<user_roles::ActiveModel> {
    user_roles::Entity::insert_many(rows.iter().map(assignment_model)).on_conflict(
        OnConflict::columns([user_roles::Column::UserId, user_roles::Column::RoleId])
            .do_nothing()
            .to_owned(),
    )
}

/// One `DELETE` matching exactly the listed `(user_id, role_id)` pairs.
fn delete_pairs(rows: &[Assignment]) -> DeleteMany<user_roles::Entity> {
    let pairs = rows.iter().fold(Condition::any(), |cond, a| {
        cond.add(
            Condition::all()
                .add(user_roles::Column::UserId.eq(a.user_id.0))
                .add(user_roles::Column::RoleId.eq(a.role_id.0)),
        )
    });
    user_roles::Entity::delete_many().filter(pairs)
}

async fn insert_assignments<C: ConnectionTrait>(
    conn: &C,
    rows: &[Assignment],
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }
    insert_pairs(rows).exec_without_returning(conn).await?;
    Ok(())
}

// ── Role assignment repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleAssignmentRepository {
    pub db: DatabaseConnection,
}

impl RoleAssignmentRepository for DbRoleAssignmentRepository {
    async fn find_role(&self, id: RoleId) -> Result<Option<Role>, TaskhubError> {
        let model = roles::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find role by id")?;
        Ok(model.map(role_from_model))
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, TaskhubError> {
        let count = users::Entity::find_by_id(id.0)
            .count(&self.db)
            .await
            .context("check user exists")?;
        Ok(count > 0)
    }

    async fn role_exists(&self, id: RoleId) -> Result<bool, TaskhubError> {
        let count = roles::Entity::find_by_id(id.0)
            .count(&self.db)
            .await
            .context("check role exists")?;
        Ok(count > 0)
    }

    async fn user_ids_in_role(&self, role_id: RoleId) -> Result<HashSet<UserId>, TaskhubError> {
        let ids: Vec<Uuid> = user_roles::Entity::find()
            .select_only()
            .column(user_roles::Column::UserId)
            .filter(user_roles::Column::RoleId.eq(role_id.0))
            .into_tuple()
            .all(&self.db)
            .await
            .context("load role members")?;
        Ok(ids.into_iter().map(UserId).collect())
    }

    async fn role_ids_of_user(&self, user_id: UserId) -> Result<HashSet<RoleId>, TaskhubError> {
        let ids: Vec<Uuid> = user_roles::Entity::find()
            .select_only()
            .column(user_roles::Column::RoleId)
            .filter(user_roles::Column::UserId.eq(user_id.0))
            .into_tuple()
            .all(&self.db)
            .await
            .context("load user roles")?;
        Ok(ids.into_iter().map(RoleId).collect())
    }

    async fn assignment_exists(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<bool, TaskhubError> {
        let count = user_roles::Entity::find_by_id((user_id.0, role_id.0))
            .count(&self.db)
            .await
            .context("check assignment exists")?;
        Ok(count > 0)
    }

    async fn apply(&self, delta: &AssignmentDelta) -> Result<(), TaskhubError> {
        let delta = delta.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    if !delta.remove.is_empty() {
                        delete_pairs(&delta.remove).exec(txn).await?;
                    }
                    insert_assignments(txn, &delta.add).await
                })
            })
            .await
            .context("apply role assignment delta")?;
        Ok(())
    }
}

// ── Role repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleRepository {
    pub db: DatabaseConnection,
}

impl RoleRepository for DbRoleRepository {
    async fn list(&self, q: Option<&str>) -> Result<Vec<Role>, TaskhubError> {
        let models = roles::Entity::find()
            .search_any(&[roles::Column::Name], q)
            .order_by_asc(roles::Column::Name)
            .all(&self.db)
            .await
            .context("list roles")?;
        Ok(models.into_iter().map(role_from_model).collect())
    }

    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, TaskhubError> {
        let model = roles::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find role by id")?;
        Ok(model.map(role_from_model))
    }

    async fn find_by_normalized_name(
        &self,
        normalized_name: &str,
    ) -> Result<Option<Role>, TaskhubError> {
        let model = roles::Entity::find()
            .filter(roles::Column::NormalizedName.eq(normalized_name))
            .one(&self.db)
            .await
            .context("find role by name")?;
        Ok(model.map(role_from_model))
    }

    async fn find_by_normalized_names(
        &self,
        normalized_names: &[String],
    ) -> Result<Vec<Role>, TaskhubError> {
        let models = roles::Entity::find()
            .filter(roles::Column::NormalizedName.is_in(normalized_names.iter().cloned()))
            .all(&self.db)
            .await
            .context("find roles by names")?;
        Ok(models.into_iter().map(role_from_model).collect())
    }

    async fn create(&self, role: &Role) -> Result<(), TaskhubError> {
        let now = Utc::now();
        roles::ActiveModel {
            id: Set(role.id.0),
            name: Set(role.name.clone()),
            normalized_name: Set(role.normalized_name.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, "create role", || format!("Role {} already exists", role.name)))?;
        Ok(())
    }

    async fn rename(
        &self,
        id: RoleId,
        name: &str,
        normalized_name: &str,
    ) -> Result<(), TaskhubError> {
        roles::ActiveModel {
            id: Set(id.0),
            name: Set(name.to_owned()),
            normalized_name: Set(normalized_name.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| write_error(e, "rename role", || format!("Role {name} already exists")))?;
        Ok(())
    }

    async fn delete(&self, id: RoleId) -> Result<(), TaskhubError> {
        roles::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete role")?;
        Ok(())
    }

    async fn members(&self, id: RoleId) -> Result<Vec<RoleMember>, TaskhubError> {
        let models = users::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                users::Relation::UserRoles.def(),
            )
            .filter(user_roles::Column::RoleId.eq(id.0))
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
            .context("list role members")?;
        Ok(models
            .into_iter()
            .map(|m| RoleMember {
                id: UserId(m.id),
                username: m.username,
                email: m.email,
            })
            .collect())
    }
}

fn role_from_model(model: roles::Model) -> Role {
    Role {
        id: RoleId(model.id),
        name: model.name,
        normalized_name: model.normalized_name,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn list(
        &self,
        q: Option<&str>,
        sort: Sort<UserSortField>,
        page: PageRequest,
    ) -> Result<Page<User>, TaskhubError> {
        let query = users::Entity::find().search_any(
            &[
                users::Column::Username,
                users::Column::Email,
                users::Column::PhoneNumber,
            ],
            q,
        );
        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count users")?;
        let column = match sort.field {
            UserSortField::Username => users::Column::Username,
            UserSortField::Email => users::Column::Email,
            UserSortField::CreatedAt => users::Column::CreatedAt,
        };
        let models = query
            .sorted(column, users::Column::Id, sort.order)
            .paged(page)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(Page::new(
            models.into_iter().map(user_from_model).collect(),
            page,
            total,
        ))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, TaskhubError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, TaskhubError> {
        let model = users::Entity::find()
            .filter(users::Column::NormalizedUsername.eq(normalize_name(username)))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn role_names(&self, id: UserId) -> Result<Vec<String>, TaskhubError> {
        let names: Vec<String> = roles::Entity::find()
            .select_only()
            .column(roles::Column::Name)
            .join(
                sea_orm::JoinType::InnerJoin,
                roles::Relation::UserRoles.def(),
            )
            .filter(user_roles::Column::UserId.eq(id.0))
            .order_by_asc(roles::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await
            .context("load user role names")?;
        Ok(names)
    }

    async fn create(&self, user: &User, role_ids: &[RoleId]) -> Result<(), TaskhubError> {
        let user = user.clone();
        let username = user.username.clone();
        let assignments: Vec<Assignment> = role_ids
            .iter()
            .map(|&role_id| Assignment {
                user_id: user.id,
                role_id,
            })
            .collect();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user.id.0),
                        username: Set(user.username),
                        normalized_username: Set(user.normalized_username),
                        email: Set(user.email),
                        full_name: Set(user.full_name),
                        phone_number: Set(user.phone_number),
                        team_id: Set(user.team_id.map(|t| t.0)),
                        lockout_enabled: Set(user.lockout_enabled),
                        lockout_end: Set(user.lockout_end),
                        access_failed_count: Set(user.access_failed_count),
                        created_at: Set(user.created_at),
                        updated_at: Set(user.updated_at),
                    }
                    .insert(txn)
                    .await?;
                    insert_assignments(txn, &assignments).await
                })
            })
            .await
            .map_err(|e| {
                txn_write_error(e, "create user", || {
                    format!("Username {username} is already taken")
                })
            })
    }

    async fn update_profile(
        &self,
        id: UserId,
        profile: &UserProfile,
    ) -> Result<(), TaskhubError> {
        users::ActiveModel {
            id: Set(id.0),
            email: Set(profile.email.clone()),
            full_name: Set(profile.full_name.clone()),
            phone_number: Set(profile.phone_number.clone()),
            team_id: Set(profile.team_id.map(|t| t.0)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user profile")?;
        Ok(())
    }

    async fn set_lockout(&self, id: UserId, lockout: Lockout) -> Result<(), TaskhubError> {
        let mut am = users::ActiveModel {
            id: Set(id.0),
            lockout_enabled: Set(lockout.enabled),
            lockout_end: Set(lockout.end),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if lockout.reset_failed_count {
            am.access_failed_count = Set(0);
        }
        am.update(&self.db).await.context("update user lockout")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        username: model.username,
        normalized_username: model.normalized_username,
        email: model.email,
        full_name: model.full_name,
        phone_number: model.phone_number,
        team_id: model.team_id.map(TeamId),
        lockout_enabled: model.lockout_enabled,
        lockout_end: model.lockout_end,
        access_failed_count: model.access_failed_count,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Team repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTeamRepository {
    pub db: DatabaseConnection,
}

impl TeamRepository for DbTeamRepository {
    async fn list(
        &self,
        sort: Sort<TeamSortField>,
        page: PageRequest,
    ) -> Result<Page<Team>, TaskhubError> {
        let total = teams::Entity::find()
            .count(&self.db)
            .await
            .context("count teams")?;
        let column = match sort.field {
            TeamSortField::Name => teams::Column::Name,
            TeamSortField::CreatedAt => teams::Column::CreatedAt,
        };
        let models = teams::Entity::find()
            .sorted(column, teams::Column::Id, sort.order)
            .paged(page)
            .all(&self.db)
            .await
            .context("list teams")?;
        Ok(Page::new(
            models.into_iter().map(team_from_model).collect(),
            page,
            total,
        ))
    }

    async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>, TaskhubError> {
        let model = teams::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find team by id")?;
        Ok(model.map(team_from_model))
    }

    async fn create(&self, draft: &TeamDraft) -> Result<Team, TaskhubError> {
        let now = Utc::now();
        let model = teams::ActiveModel {
            name: Set(draft.name.clone()),
            description: Set(draft.description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create team")?;
        Ok(team_from_model(model))
    }

    async fn update(&self, id: TeamId, draft: &TeamDraft) -> Result<(), TaskhubError> {
        teams::ActiveModel {
            id: Set(id.0),
            name: Set(draft.name.clone()),
            description: Set(draft.description.clone()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update team")?;
        Ok(())
    }

    async fn delete(&self, id: TeamId) -> Result<(), TaskhubError> {
        teams::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete team")?;
        Ok(())
    }

    async fn assign_users(&self, id: TeamId, user_ids: &[UserId]) -> Result<u64, TaskhubError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::TeamId, Expr::value(id.0))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.is_in(user_ids.iter().map(|u| u.0)))
            .exec(&self.db)
            .await
            .context("assign users to team")?;
        Ok(result.rows_affected)
    }
}

fn team_from_model(model: teams::Model) -> Team {
    Team {
        id: TeamId(model.id),
        name: model.name,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Task repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTaskRepository {
    pub db: DatabaseConnection,
}

impl TaskRepository for DbTaskRepository {
    async fn list(
        &self,
        filter: &TaskFilter,
        sort: Sort<TaskSortField>,
        page: PageRequest,
    ) -> Result<Page<Task>, TaskhubError> {
        let mut query = task_items::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(task_items::Column::Status.eq(status.as_str()));
        }
        if let Some(user_id) = filter.assigned_to {
            query = query.filter(task_items::Column::AssignedTo.eq(user_id.0));
        }
        if let Some(team_id) = filter.team_id {
            query = query.filter(task_items::Column::TeamId.eq(team_id.0));
        }
        if let Some(day) = filter.due_date {
            let start = day.and_time(NaiveTime::MIN).and_utc();
            query = query
                .filter(task_items::Column::DueDate.gte(start))
                .filter(task_items::Column::DueDate.lt(start + Duration::days(1)));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count tasks")?;
        let column = match sort.field {
            TaskSortField::CreatedAt => task_items::Column::CreatedAt,
            TaskSortField::Title => task_items::Column::Title,
            TaskSortField::DueDate => task_items::Column::DueDate,
            TaskSortField::Status => task_items::Column::Status,
        };
        let models = query
            .sorted(column, task_items::Column::Id, sort.order)
            .paged(page)
            .all(&self.db)
            .await
            .context("list tasks")?;
        let items = models
            .into_iter()
            .map(task_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, page, total))
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskhubError> {
        let model = task_items::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find task by id")?;
        model.map(task_from_model).transpose()
    }

    async fn create(&self, draft: &TaskDraft, created_by: UserId) -> Result<Task, TaskhubError> {
        let now = Utc::now();
        let model = task_items::ActiveModel {
            title: Set(draft.title.clone()),
            description: Set(draft.description.clone()),
            status: Set(draft.status.as_str().to_owned()),
            due_date: Set(draft.due_date),
            assigned_to: Set(draft.assigned_to.map(|u| u.0)),
            created_by: Set(created_by.0),
            team_id: Set(draft.team_id.map(|t| t.0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create task")?;
        task_from_model(model)
    }

    async fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<(), TaskhubError> {
        task_items::ActiveModel {
            id: Set(id.0),
            title: Set(draft.title.clone()),
            description: Set(draft.description.clone()),
            status: Set(draft.status.as_str().to_owned()),
            due_date: Set(draft.due_date),
            assigned_to: Set(draft.assigned_to.map(|u| u.0)),
            team_id: Set(draft.team_id.map(|t| t.0)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update task")?;
        Ok(())
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<(), TaskhubError> {
        task_items::ActiveModel {
            id: Set(id.0),
            status: Set(status.as_str().to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update task status")?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), TaskhubError> {
        task_items::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete task")?;
        Ok(())
    }
}

fn task_from_model(model: task_items::Model) -> Result<Task, TaskhubError> {
    let status = model
        .status
        .parse::<TaskStatus>()
        .with_context(|| format!("task {} has unreadable status", model.id))?;
    Ok(Task {
        id: TaskId(model.id),
        title: model.title,
        description: model.description,
        status,
        due_date: model.due_date,
        assigned_to: model.assigned_to.map(UserId),
        created_by: UserId(model.created_by),
        team_id: model.team_id.map(TeamId),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
