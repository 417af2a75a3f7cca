use chrono::{TimeZone, Utc};
use uuid::Uuid;

use taskhub::domain::types::{Task, TaskDraft, TaskFilter, TaskSortField};
use taskhub::error::TaskhubError;
use taskhub::usecase::task::{
    CreateTaskUseCase, DeleteTaskUseCase, GetTaskUseCase, ListTasksUseCase,
    UpdateTaskStatusUseCase, UpdateTaskUseCase,
};
use taskhub_domain::id::{TeamId, UserId};
use taskhub_domain::pagination::{Page, PageRequest};
use taskhub_domain::sort::{Sort, SortOrder};
use taskhub_domain::task::TaskStatus;

use crate::helpers::InMemoryStore;

fn draft(title: &str, assigned_to: Option<UserId>) -> TaskDraft {
    TaskDraft {
        title: title.to_owned(),
        description: "Write the quarterly report".to_owned(),
        status: TaskStatus::Todo,
        due_date: None,
        assigned_to,
        team_id: None,
    }
}

fn create_usecase(
    store: &InMemoryStore,
) -> CreateTaskUseCase<InMemoryStore, InMemoryStore, InMemoryStore> {
    CreateTaskUseCase {
        tasks: store.clone(),
        users: store.clone(),
        teams: store.clone(),
    }
}

#[tokio::test]
async fn should_create_task_recording_creator() {
    let store = InMemoryStore::new();
    let manager = store.add_user("manager").id;
    let worker = store.add_user("worker").id;

    let task = create_usecase(&store)
        .execute(manager, draft("  Report  ", Some(worker)))
        .await
        .unwrap();

    assert_eq!(task.title, "Report");
    assert_eq!(task.created_by, manager);
    assert_eq!(task.assigned_to, Some(worker));
}

#[tokio::test]
async fn should_reject_unknown_assignee_and_team() {
    let store = InMemoryStore::new();
    let manager = store.add_user("manager").id;

    let err = create_usecase(&store)
        .execute(manager, draft("Report", Some(UserId(Uuid::now_v7()))))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskhubError::UserNotFound));

    let mut with_team = draft("Report", None);
    with_team.team_id = Some(TeamId(42));
    let err = create_usecase(&store)
        .execute(manager, with_team)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskhubError::TeamNotFound));
}

#[tokio::test]
async fn should_require_title() {
    let store = InMemoryStore::new();
    let manager = store.add_user("manager").id;

    let err = create_usecase(&store)
        .execute(manager, draft(" ", None))
        .await
        .unwrap_err();

    assert!(matches!(err, TaskhubError::Validation(m) if m == "Title is required"));
}

#[tokio::test]
async fn should_let_only_assignee_change_status() {
    let store = InMemoryStore::new();
    let manager = store.add_user("manager").id;
    let worker = store.add_user("worker").id;
    let other = store.add_user("other").id;
    let task = create_usecase(&store)
        .execute(manager, draft("Report", Some(worker)))
        .await
        .unwrap();
    let usecase = UpdateTaskStatusUseCase { tasks: store.clone() };

    let err = usecase
        .execute(other, task.id, TaskStatus::Done)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskhubError::TaskNotFound));

    usecase
        .execute(worker, task.id, TaskStatus::InProgress)
        .await
        .unwrap();
    let fetched = GetTaskUseCase { tasks: store.clone() }
        .execute(task.id)
        .await
        .unwrap();
    assert_eq!(fetched.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn should_filter_tasks_by_status_and_due_day() {
    let store = InMemoryStore::new();
    let manager = store.add_user("manager").id;
    let due = Utc.with_ymd_and_hms(2025, 9, 15, 17, 0, 0).unwrap();
    let create = create_usecase(&store);

    let mut first = draft("First", None);
    first.due_date = Some(due);
    create.execute(manager, first).await.unwrap();
    let mut second = draft("Second", None);
    second.status = TaskStatus::Done;
    create.execute(manager, second).await.unwrap();

    let list = ListTasksUseCase { tasks: store.clone() };
    let by_day = list
        .execute(
            &TaskFilter {
                due_date: Some(due.date_naive()),
                ..Default::default()
            },
            Sort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    let done = list
        .execute(
            &TaskFilter {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
            Sort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(by_day.items.len(), 1);
    assert_eq!(by_day.items[0].title, "First");
    assert_eq!(done.items.len(), 1);
    assert_eq!(done.items[0].title, "Second");
}

#[tokio::test]
async fn should_list_newest_tasks_first_unless_sorted() {
    let store = InMemoryStore::new();
    let manager = store.add_user("manager").id;
    let create = create_usecase(&store);
    for title in ["Budget", "Audit", "Roadmap"] {
        create.execute(manager, draft(title, None)).await.unwrap();
    }
    let list = ListTasksUseCase { tasks: store.clone() };

    let newest = list
        .execute(&TaskFilter::default(), Sort::default(), PageRequest::default())
        .await
        .unwrap();
    let by_title = list
        .execute(
            &TaskFilter::default(),
            Sort::resolve(Some(TaskSortField::Title), None),
            PageRequest::default(),
        )
        .await
        .unwrap();
    let oldest = list
        .execute(
            &TaskFilter::default(),
            Sort::resolve(None, Some(SortOrder::Asc)),
            PageRequest::default(),
        )
        .await
        .unwrap();

    let titles = |page: &Page<Task>| {
        page.items.iter().map(|t| t.title.clone()).collect::<Vec<_>>()
    };
    assert_eq!(titles(&newest), vec!["Roadmap", "Audit", "Budget"]);
    assert_eq!(titles(&by_title), vec!["Audit", "Budget", "Roadmap"]);
    assert_eq!(titles(&oldest), vec!["Budget", "Audit", "Roadmap"]);
}

#[tokio::test]
async fn should_update_and_delete_task() {
    let store = InMemoryStore::new();
    let manager = store.add_user("manager").id;
    let task = create_usecase(&store)
        .execute(manager, draft("Report", None))
        .await
        .unwrap();

    UpdateTaskUseCase {
        tasks: store.clone(),
        users: store.clone(),
        teams: store.clone(),
    }
    .execute(task.id, draft("Final report", Some(manager)))
    .await
    .unwrap();
    let fetched = GetTaskUseCase { tasks: store.clone() }
        .execute(task.id)
        .await
        .unwrap();
    assert_eq!(fetched.title, "Final report");

    DeleteTaskUseCase { tasks: store.clone() }
        .execute(task.id)
        .await
        .unwrap();
    let err = GetTaskUseCase { tasks: store.clone() }
        .execute(task.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskhubError::TaskNotFound));
}
