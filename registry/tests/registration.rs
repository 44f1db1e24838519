use std::sync::Arc;

use adapter::table::memory::MemoryTable;
use adapter::table::KvTable;
use kernel::model::id::{EventId, UserId};
use kernel::service::registration::RegistrationStatus;
use registry::AppRegistry;
use shared::error::AppError;

fn setup() -> (Arc<MemoryTable>, AppRegistry) {
    let _ = shared::logging::init_logger();
    let table = Arc::new(MemoryTable::new());
    let registry = AppRegistry::new(table.clone());
    (table, registry)
}

async fn seed_users(registry: &AppRegistry, user_ids: &[&str]) {
    let service = registry.registration_service();
    for user_id in user_ids {
        service.create_user(user_id, "Test User").await.unwrap();
    }
}

async fn waitlist_sks(table: &MemoryTable, event_id: &str) -> Vec<String> {
    table
        .query_prefix(&format!("EVENT#{event_id}"), "WAIT#")
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.sk)
        .collect()
}

#[tokio::test]
async fn duplicate_user_creation_rejected() {
    let (_, registry) = setup();
    let service = registry.registration_service();

    service.create_user("alice", "Alice").await.unwrap();
    let err = service.create_user("alice", "Alice Again").await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateUser(_)));
}

#[tokio::test]
async fn register_unknown_user_or_event_fails() {
    let (_, registry) = setup();
    let service = registry.registration_service();
    seed_users(&registry, &["alice"]).await;
    service.create_event("party", "Party", 2, true).await.unwrap();

    let err = service
        .register_user(&UserId::from("ghost"), &EventId::from("party"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EntityNotFound(_)));

    let err = service
        .register_user(&UserId::from("alice"), &EventId::from("nowhere"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EntityNotFound(_)));
}

#[tokio::test]
async fn fifo_promotion_on_unregister() {
    let (table, registry) = setup();
    let service = registry.registration_service();
    seed_users(&registry, &["a", "b", "c"]).await;
    service.create_event("talk", "Talk", 1, true).await.unwrap();

    let event_id = EventId::from("talk");
    let first = service
        .register_user(&UserId::from("a"), &event_id)
        .await
        .unwrap();
    assert_eq!(first.status, RegistrationStatus::Registered);

    let second = service
        .register_user(&UserId::from("b"), &event_id)
        .await
        .unwrap();
    assert_eq!(second.status, RegistrationStatus::Waitlisted);

    let third = service
        .register_user(&UserId::from("c"), &event_id)
        .await
        .unwrap();
    assert_eq!(third.status, RegistrationStatus::Waitlisted);

    let event = registry
        .event_repository()
        .find_by_id(&event_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.registered_users, vec![UserId::from("a")]);
    assert_eq!(event.waitlist, vec![UserId::from("b"), UserId::from("c")]);

    // A leaves: B is promoted, C shifts to the head of the waitlist.
    service
        .unregister_user(&UserId::from("a"), &event_id)
        .await
        .unwrap();

    let event = registry
        .event_repository()
        .find_by_id(&event_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.registered_users, vec![UserId::from("b")]);
    assert_eq!(event.waitlist, vec![UserId::from("c")]);
    assert_eq!(waitlist_sks(&table, "talk").await, vec!["WAIT#00000#c"]);
}

#[tokio::test]
async fn full_event_without_waitlist_rejects() {
    let (_, registry) = setup();
    let service = registry.registration_service();
    seed_users(&registry, &["a", "b"]).await;
    service.create_event("talk", "Talk", 1, false).await.unwrap();

    let event_id = EventId::from("talk");
    service
        .register_user(&UserId::from("a"), &event_id)
        .await
        .unwrap();

    let err = service
        .register_user(&UserId::from("b"), &event_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EventFull(_)));
}

#[tokio::test]
async fn double_registration_rejected_in_both_states() {
    let (_, registry) = setup();
    let service = registry.registration_service();
    seed_users(&registry, &["a", "b"]).await;
    service.create_event("talk", "Talk", 1, true).await.unwrap();

    let event_id = EventId::from("talk");
    service
        .register_user(&UserId::from("a"), &event_id)
        .await
        .unwrap();
    service
        .register_user(&UserId::from("b"), &event_id)
        .await
        .unwrap();

    // Already registered.
    let err = service
        .register_user(&UserId::from("a"), &event_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyRegistered(_)));

    // Already on the waitlist.
    let err = service
        .register_user(&UserId::from("b"), &event_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyRegistered(_)));
}

#[tokio::test]
async fn unregister_non_member_fails() {
    let (_, registry) = setup();
    let service = registry.registration_service();
    seed_users(&registry, &["a"]).await;
    service.create_event("talk", "Talk", 1, true).await.unwrap();

    let err = service
        .unregister_user(&UserId::from("a"), &EventId::from("talk"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotRegistered(_)));

    let err = service
        .unregister_user(&UserId::from("a"), &EventId::from("nowhere"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EntityNotFound(_)));
}

#[tokio::test]
async fn waitlist_removal_reindexes_contiguously() {
    let (table, registry) = setup();
    let service = registry.registration_service();
    seed_users(&registry, &["a", "b", "c", "d"]).await;
    service.create_event("talk", "Talk", 1, true).await.unwrap();

    let event_id = EventId::from("talk");
    for user in ["a", "b", "c", "d"] {
        service
            .register_user(&UserId::from(user), &event_id)
            .await
            .unwrap();
    }

    // Remove the middle waitlist member; the survivors keep their relative
    // order under positions renumbered from zero.
    service
        .unregister_user(&UserId::from("c"), &event_id)
        .await
        .unwrap();

    let event = registry
        .event_repository()
        .find_by_id(&event_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.waitlist, vec![UserId::from("b"), UserId::from("d")]);
    assert_eq!(
        waitlist_sks(&table, "talk").await,
        vec!["WAIT#00000#b", "WAIT#00001#d"]
    );
}

#[tokio::test]
async fn capacity_invariant_holds_throughout() {
    let (_, registry) = setup();
    let service = registry.registration_service();
    let users: Vec<String> = (0..8).map(|i| format!("user{i}")).collect();
    for user in &users {
        service.create_user(user, "Test User").await.unwrap();
    }
    service.create_event("talk", "Talk", 3, true).await.unwrap();

    let event_id = EventId::from("talk");
    for user in &users {
        service
            .register_user(&UserId::from(user.as_str()), &event_id)
            .await
            .unwrap();
        let event = registry
            .event_repository()
            .find_by_id(&event_id)
            .await
            .unwrap()
            .unwrap();
        assert!(event.registered_users.len() <= event.capacity as usize);
    }

    for user in &users {
        service
            .unregister_user(&UserId::from(user.as_str()), &event_id)
            .await
            .unwrap();
        let event = registry
            .event_repository()
            .find_by_id(&event_id)
            .await
            .unwrap()
            .unwrap();
        assert!(event.registered_users.len() <= event.capacity as usize);
    }
}

#[tokio::test]
async fn reverse_lookups_are_role_scoped() {
    let (_, registry) = setup();
    let service = registry.registration_service();
    seed_users(&registry, &["alice", "taken"]).await;
    service.create_event("open", "Open", 5, true).await.unwrap();
    service.create_event("packed", "Packed", 1, true).await.unwrap();

    let alice = UserId::from("alice");
    service
        .register_user(&alice, &EventId::from("open"))
        .await
        .unwrap();
    service
        .register_user(&UserId::from("taken"), &EventId::from("packed"))
        .await
        .unwrap();
    service
        .register_user(&alice, &EventId::from("packed"))
        .await
        .unwrap();

    let registered = service.user_registrations(&alice).await.unwrap();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].event_id, EventId::from("open"));

    let waitlisted = service.user_waitlists(&alice).await.unwrap();
    assert_eq!(waitlisted.len(), 1);
    assert_eq!(waitlisted[0].event_id, EventId::from("packed"));
}

#[tokio::test]
async fn event_registrations_lists_members() {
    let (_, registry) = setup();
    let service = registry.registration_service();
    seed_users(&registry, &["a", "b"]).await;
    service.create_event("talk", "Talk", 5, false).await.unwrap();

    let event_id = EventId::from("talk");
    service
        .register_user(&UserId::from("a"), &event_id)
        .await
        .unwrap();
    service
        .register_user(&UserId::from("b"), &event_id)
        .await
        .unwrap();

    let members = service.event_registrations(&event_id).await.unwrap();
    assert_eq!(members, vec![UserId::from("a"), UserId::from("b")]);

    let err = service
        .event_registrations(&EventId::from("nowhere"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EntityNotFound(_)));
}
