use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use taskhub::domain::types::{UserSortField, permanent_lockout_end};
use taskhub::error::TaskhubError;
use taskhub::usecase::role_assignment::{AssignRolesToUserUseCase, CANNOT_UNASSIGN_ADMIN};
use taskhub::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeactivateUserUseCase, GetUserUseCase, LOCKED,
    ListUsersUseCase, RELEASED, ReactivateUserUseCase, UpdateUserInput, UpdateUserUseCase,
};
use taskhub_domain::id::TeamId;
use taskhub_domain::pagination::PageRequest;
use taskhub_domain::sort::{Sort, SortOrder};

use crate::helpers::InMemoryStore;

fn create_input(username: &str, roles: &[&str]) -> CreateUserInput {
    CreateUserInput {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        full_name: "Test User".to_owned(),
        phone_number: None,
        team_id: None,
        roles: roles.iter().map(|r| (*r).to_owned()).collect(),
    }
}

fn create_usecase(
    store: &InMemoryStore,
) -> CreateUserUseCase<InMemoryStore, InMemoryStore, InMemoryStore> {
    CreateUserUseCase {
        users: store.clone(),
        roles: store.clone(),
        teams: store.clone(),
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_user_without_admin_and_unknown_roles() {
    let store = InMemoryStore::new();
    store.add_admin_role();
    let manager = store.add_role("Manager");

    let user = create_usecase(&store)
        .execute(create_input("alice", &["admin", "manager", "MANAGER", "Ghosts"]))
        .await
        .unwrap();

    assert_eq!(user.normalized_username, "ALICE");
    assert_eq!(store.roles_of(user.id), HashSet::from([manager.id]));
}

#[tokio::test]
async fn should_reject_taken_username_in_any_case() {
    let store = InMemoryStore::new();
    store.add_user("alice");

    let err = create_usecase(&store)
        .execute(create_input("ALICE", &[]))
        .await
        .unwrap_err();

    assert!(matches!(err, TaskhubError::Conflict(_)));
}

#[tokio::test]
async fn should_reject_unknown_team_on_create() {
    let store = InMemoryStore::new();
    let mut input = create_input("alice", &[]);
    input.team_id = Some(TeamId(99));

    let err = create_usecase(&store).execute(input).await.unwrap_err();

    assert!(matches!(err, TaskhubError::TeamNotFound));
}

#[tokio::test]
async fn should_require_email() {
    let store = InMemoryStore::new();
    let mut input = create_input("alice", &[]);
    input.email = "  ".to_owned();

    let err = create_usecase(&store).execute(input).await.unwrap_err();

    assert!(matches!(err, TaskhubError::Validation(_)));
}

// ── ListUsers / GetUser ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_search_users_and_paginate() {
    let store = InMemoryStore::new();
    for name in ["carol", "alice", "bob", "alina"] {
        store.add_user(name);
    }
    let usecase = ListUsersUseCase { users: store.clone() };

    let page = usecase
        .execute(
            Some(" ALI "),
            Sort::default(),
            PageRequest { per_page: 1, page: 2 },
        )
        .await
        .unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].username, "alina");
}

#[tokio::test]
async fn should_sort_users_by_email_descending() {
    let store = InMemoryStore::new();
    let accounts = [
        ("alice", "zed@corp.test"),
        ("bob", "amy@corp.test"),
        ("carol", "kim@corp.test"),
    ];
    for (name, email) in accounts {
        let id = store.add_user(name).id;
        let mut data = store.data.lock().unwrap();
        if let Some(user) = data.users.iter_mut().find(|u| u.id == id) {
            user.email = email.to_owned();
        }
    }
    let usecase = ListUsersUseCase { users: store.clone() };

    let page = usecase
        .execute(
            None,
            Sort::resolve(Some(UserSortField::Email), Some(SortOrder::Desc)),
            PageRequest::default(),
        )
        .await
        .unwrap();

    let names: Vec<_> = page.items.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "carol", "bob"]);
}

#[tokio::test]
async fn should_get_user_with_role_names() {
    let store = InMemoryStore::new();
    let manager = store.add_role("Manager");
    let alice = store.add_user("alice");
    store.assign(alice.id, manager.id);

    let found = GetUserUseCase { users: store.clone() }
        .execute("Alice")
        .await
        .unwrap();

    assert_eq!(found.user.id, alice.id);
    assert_eq!(found.roles, vec!["Manager".to_owned()]);
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_profile_and_reconcile_roles_keeping_admin() {
    let store = InMemoryStore::new();
    let admin = store.add_admin_role();
    let manager = store.add_role("Manager");
    let employee = store.add_role("Employee");
    let boss = store.add_user("boss");
    store.assign(boss.id, admin.id);
    store.assign(boss.id, manager.id);
    let team = store.add_team("Platform");

    let usecase = UpdateUserUseCase {
        users: store.clone(),
        roles: store.clone(),
        teams: store.clone(),
        assign: AssignRolesToUserUseCase {
            repo: store.clone(),
            admin,
        },
    };
    let outcome = usecase
        .execute(
            "boss",
            UpdateUserInput {
                username: "BOSS".to_owned(),
                email: "boss@corp.example".to_owned(),
                full_name: "The Boss".to_owned(),
                phone_number: Some("555-0101".to_owned()),
                team_id: Some(team.id),
                roles: vec!["employee".to_owned()],
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.advisories, vec![CANNOT_UNASSIGN_ADMIN.to_owned()]);
    assert_eq!(
        store.roles_of(boss.id),
        HashSet::from([admin.id, employee.id])
    );
    let updated = store.user(boss.id);
    assert_eq!(updated.email, "boss@corp.example");
    assert_eq!(updated.team_id, Some(team.id));
}

#[tokio::test]
async fn should_reject_username_change() {
    let store = InMemoryStore::new();
    let admin = store.add_admin_role();
    store.add_user("alice");

    let usecase = UpdateUserUseCase {
        users: store.clone(),
        roles: store.clone(),
        teams: store.clone(),
        assign: AssignRolesToUserUseCase {
            repo: store.clone(),
            admin,
        },
    };
    let err = usecase
        .execute(
            "alice",
            UpdateUserInput {
                username: "alicia".to_owned(),
                email: "alice@example.com".to_owned(),
                full_name: String::new(),
                phone_number: None,
                team_id: None,
                roles: Vec::new(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TaskhubError::Validation(m) if m == "Username cannot be changed."));
}

// ── Deactivate / Reactivate ──────────────────────────────────────────────────

#[tokio::test]
async fn should_lock_and_release_user() {
    let store = InMemoryStore::new();
    let alice = store.add_user("alice");
    store.data.lock().unwrap().users[0].access_failed_count = 3;

    let message = DeactivateUserUseCase { users: store.clone() }
        .execute("alice")
        .await
        .unwrap();
    assert_eq!(message, LOCKED);
    let locked = store.user(alice.id);
    assert_eq!(locked.lockout_end, Some(permanent_lockout_end()));
    assert!(locked.is_locked(Utc::now()));

    let message = ReactivateUserUseCase { users: store.clone() }
        .execute("alice")
        .await
        .unwrap();
    assert_eq!(message, RELEASED);
    let released = store.user(alice.id);
    assert!(!released.is_locked(Utc::now()));
    assert_eq!(released.access_failed_count, 0);
}

#[tokio::test]
async fn should_refuse_deactivating_admin_user() {
    let store = InMemoryStore::new();
    let admin = store.add_admin_role();
    let root = store.add_user("root");
    store.assign(root.id, admin.id);

    let err = DeactivateUserUseCase { users: store.clone() }
        .execute("root")
        .await
        .unwrap_err();

    assert!(matches!(err, TaskhubError::ForbiddenOperation(_)));
    assert!(store.user(root.id).lockout_end.is_none());
}

#[tokio::test]
async fn should_return_user_not_found_for_unknown_username() {
    let store = InMemoryStore::new();

    let err = ReactivateUserUseCase { users: store.clone() }
        .execute(&Uuid::now_v7().to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, TaskhubError::UserNotFound));
}
