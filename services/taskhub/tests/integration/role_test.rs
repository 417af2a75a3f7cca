use uuid::Uuid;

use taskhub::error::TaskhubError;
use taskhub::usecase::role::{
    CreateRoleUseCase, DeleteRoleUseCase, GetRoleUseCase, GetUsersInRoleUseCase,
    ListRolesUseCase, UpdateRoleUseCase,
};
use taskhub_domain::id::RoleId;

use crate::helpers::InMemoryStore;

#[tokio::test]
async fn should_create_role_with_normalized_name() {
    let store = InMemoryStore::new();
    let usecase = CreateRoleUseCase { repo: store.clone() };

    let role = usecase.execute("Editors").await.unwrap();

    assert_eq!(role.normalized_name, "EDITORS");
    let fetched = GetRoleUseCase { repo: store.clone() }
        .execute(role.id)
        .await
        .unwrap();
    assert_eq!(fetched, role);
}

#[tokio::test]
async fn should_reject_duplicate_role_name_in_any_case() {
    let store = InMemoryStore::new();
    store.add_role("Editors");
    let usecase = CreateRoleUseCase { repo: store.clone() };

    let err = usecase.execute("editors").await.unwrap_err();

    assert!(matches!(err, TaskhubError::Conflict(_)));
}

#[tokio::test]
async fn should_refuse_creating_admin_role() {
    let store = InMemoryStore::new();
    let usecase = CreateRoleUseCase { repo: store.clone() };

    let err = usecase.execute("aDmIn").await.unwrap_err();

    assert!(matches!(err, TaskhubError::ForbiddenOperation(m) if m == "Can not create Admin role"));
}

#[tokio::test]
async fn should_reject_non_alphabetic_role_name() {
    let store = InMemoryStore::new();
    let usecase = CreateRoleUseCase { repo: store.clone() };

    let err = usecase.execute("Team 1").await.unwrap_err();

    assert!(matches!(err, TaskhubError::Validation(_)));
}

#[tokio::test]
async fn should_list_roles_matching_query_ordered_by_name() {
    let store = InMemoryStore::new();
    store.add_role("Viewers");
    store.add_role("Editors");
    store.add_role("Auditors");

    let usecase = ListRolesUseCase { repo: store.clone() };
    let all = usecase.execute(None).await.unwrap();
    let filtered = usecase.execute(Some("s")).await.unwrap();
    let ers = usecase.execute(Some("ers")).await.unwrap();
    let audit = usecase.execute(Some("AUDIT")).await.unwrap();

    let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Auditors", "Editors", "Viewers"]);
    assert_eq!(filtered.len(), 3);
    assert_eq!(ers.len(), 1);
    assert_eq!(ers[0].name, "Viewers");
    assert_eq!(audit.len(), 1);
}

#[tokio::test]
async fn should_rename_role() {
    let store = InMemoryStore::new();
    let role = store.add_role("Editors");
    let usecase = UpdateRoleUseCase { repo: store.clone() };

    let renamed = usecase.execute(role.id, "Writers").await.unwrap();

    assert_eq!(renamed.normalized_name, "WRITERS");
    assert_eq!(
        GetRoleUseCase { repo: store.clone() }
            .execute(role.id)
            .await
            .unwrap()
            .name,
        "Writers"
    );
}

#[tokio::test]
async fn should_refuse_renaming_admin_role_or_renaming_to_admin() {
    let store = InMemoryStore::new();
    let admin = store.add_admin_role();
    let editors = store.add_role("Editors");
    let usecase = UpdateRoleUseCase { repo: store.clone() };

    let err = usecase.execute(admin.id, "Owners").await.unwrap_err();
    assert!(matches!(err, TaskhubError::ForbiddenOperation(m) if m == "Can not update this role"));

    let err = usecase.execute(editors.id, "Admin").await.unwrap_err();
    assert!(matches!(err, TaskhubError::ForbiddenOperation(m) if m == "Can not update to Admin role"));
}

#[tokio::test]
async fn should_delete_role_and_its_assignments() {
    let store = InMemoryStore::new();
    let editors = store.add_role("Editors");
    let u1 = store.add_user("u1").id;
    store.assign(u1, editors.id);

    DeleteRoleUseCase { repo: store.clone() }
        .execute(editors.id)
        .await
        .unwrap();

    assert!(store.roles_of(u1).is_empty());
    let err = GetRoleUseCase { repo: store.clone() }
        .execute(editors.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskhubError::RoleNotFound));
}

#[tokio::test]
async fn should_refuse_deleting_admin_role() {
    let store = InMemoryStore::new();
    let admin = store.add_admin_role();

    let err = DeleteRoleUseCase { repo: store.clone() }
        .execute(admin.id)
        .await
        .unwrap_err();

    assert!(matches!(err, TaskhubError::ForbiddenOperation(_)));
}

#[tokio::test]
async fn should_list_role_members_ordered_by_username() {
    let store = InMemoryStore::new();
    let editors = store.add_role("Editors");
    let zed = store.add_user("zed").id;
    let amy = store.add_user("amy").id;
    store.add_user("bob");
    store.assign(zed, editors.id);
    store.assign(amy, editors.id);

    let members = GetUsersInRoleUseCase { repo: store.clone() }
        .execute(editors.id)
        .await
        .unwrap();

    let names: Vec<_> = members.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(names, vec!["amy", "zed"]);
}

#[tokio::test]
async fn should_return_role_not_found_for_members_of_unknown_role() {
    let store = InMemoryStore::new();

    let err = GetUsersInRoleUseCase { repo: store.clone() }
        .execute(RoleId(Uuid::now_v7()))
        .await
        .unwrap_err();

    assert!(matches!(err, TaskhubError::RoleNotFound));
}
