use chrono::{Duration, Utc};
use emis_role_application::{RoleListQuery, RoleRepository};
use emis_role_core::AppError;
use emis_role_domain::{Role, RoleChanges, RoleId};

use super::InMemoryRoleRepository;

fn role(name: &str, description: Option<&str>) -> Role {
    Role::create(
        RoleId::new(),
        RoleChanges {
            name: Some(name.to_owned()),
            description: description.map(ToOwned::to_owned),
            ..RoleChanges::default()
        },
        Utc::now(),
    )
    .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn insert_rejects_duplicate_name_and_id() {
    let repository = InMemoryRoleRepository::new();
    let clerk = role("Clerk", None);

    assert!(repository.insert_role(clerk.clone()).await.is_ok());

    let same_name = repository.insert_role(role("Clerk", None)).await;
    let same_id = repository.insert_role(clerk).await;

    assert!(matches!(same_name, Err(AppError::Conflict(_))));
    assert!(matches!(same_id, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn find_by_name_is_exact() {
    let repository = InMemoryRoleRepository::new();
    assert!(repository.insert_role(role("IT Officer", None)).await.is_ok());

    let exact = repository.find_role_by_name("IT Officer").await;
    let different_case = repository.find_role_by_name("it officer").await;

    assert!(matches!(exact, Ok(Some(_))));
    assert!(matches!(different_case, Ok(None)));
}

#[tokio::test]
async fn update_requires_existing_role_and_unique_name() {
    let repository = InMemoryRoleRepository::new();
    let clerk = role("Clerk", None);
    let supervisor = role("Supervisor", None);
    assert!(repository.insert_role(clerk.clone()).await.is_ok());
    assert!(repository.insert_role(supervisor.clone()).await.is_ok());

    let missing = repository.update_role(role("Ghost", None)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let renamed = supervisor
        .merged(
            RoleChanges {
                name: Some("Clerk".to_owned()),
                ..RoleChanges::default()
            },
            Utc::now() + Duration::seconds(1),
        )
        .unwrap_or_else(|_| unreachable!());
    let conflict = repository.update_role(renamed).await;
    assert!(matches!(conflict, Err(AppError::Conflict(_))));

    let described = clerk
        .merged(
            RoleChanges {
                description: Some("Files records".to_owned()),
                ..RoleChanges::default()
            },
            Utc::now() + Duration::seconds(1),
        )
        .unwrap_or_else(|_| unreachable!());
    assert!(repository.update_role(described).await.is_ok());

    let stored = repository.find_role(clerk.id()).await;
    assert_eq!(
        stored
            .ok()
            .flatten()
            .map(|stored| stored.description().to_owned()),
        Some("Files records".to_owned())
    );
}

#[tokio::test]
async fn delete_returns_removed_role_once() {
    let repository = InMemoryRoleRepository::new();
    let clerk = role("Clerk", None);
    assert!(repository.insert_role(clerk.clone()).await.is_ok());

    let first = repository.delete_role(clerk.id()).await;
    let second = repository.delete_role(clerk.id()).await;

    assert_eq!(first.ok().flatten(), Some(clerk));
    assert!(matches!(second, Ok(None)));
}

#[tokio::test]
async fn list_orders_by_name_and_applies_window_and_search() {
    let repository = InMemoryRoleRepository::new();
    for (name, description) in [
        ("Supervisor", Some("Leads field teams")),
        ("Clerk", None),
        ("Dispatcher", Some("Routes field teams")),
    ] {
        assert!(repository.insert_role(role(name, description)).await.is_ok());
    }

    let window = repository
        .list_roles(&RoleListQuery {
            limit: 2,
            skip: 1,
            search: None,
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(window.total, 3);
    assert_eq!(
        window.roles.iter().map(Role::name).collect::<Vec<_>>(),
        vec!["Dispatcher", "Supervisor"]
    );
    assert!(window.last_modified.is_some());

    let searched = repository
        .list_roles(&RoleListQuery {
            search: Some("FIELD".to_owned()),
            ..RoleListQuery::default()
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(searched.total, 2);
    assert_eq!(
        searched.roles.iter().map(Role::name).collect::<Vec<_>>(),
        vec!["Dispatcher", "Supervisor"]
    );
}

#[tokio::test]
async fn empty_listing_has_no_last_modified() {
    let repository = InMemoryRoleRepository::new();

    let listing = repository
        .list_roles(&RoleListQuery::default())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(listing.total, 0);
    assert!(listing.roles.is_empty());
    assert_eq!(listing.last_modified, None);
}
