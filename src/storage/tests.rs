//! Parameterized tests for storage backends.
//!
//! Every [`UserRepository`] implementation must pass the same suite, so both
//! `InMemoryStorage` and `JsonFileStorage` call [`test_user_repository`].

use super::UserRepository;
use crate::user::{NewUser, User};

fn sample(id: u64) -> User {
    NewUser::new(
        format!("User {id}"),
        format!("user{id}@example.com"),
        format!("{id} Main Street"),
        format!("555-01{id:02}"),
    )
    .with_id(id)
}

/// Test suite for any UserRepository implementation.
pub async fn test_user_repository<R: UserRepository>(storage: R) {
    test_starts_empty(&storage).await;
    test_save_then_load(&storage).await;
    test_save_replaces_collection(&storage).await;
    test_order_is_preserved(&storage).await;
    test_save_empty(&storage).await;
}

async fn test_starts_empty<R: UserRepository>(storage: &R) {
    let users = storage.load().await.unwrap();
    assert!(users.is_empty(), "fresh storage should be empty");
}

async fn test_save_then_load<R: UserRepository>(storage: &R) {
    let users = vec![sample(1)];
    storage.save(&users).await.unwrap();

    assert_eq!(storage.load().await.unwrap(), users);
}

async fn test_save_replaces_collection<R: UserRepository>(storage: &R) {
    storage.save(&[sample(1), sample(2)]).await.unwrap();
    storage.save(&[sample(3)]).await.unwrap();

    let loaded = storage.load().await.unwrap();
    assert_eq!(loaded, vec![sample(3)]);
}

async fn test_order_is_preserved<R: UserRepository>(storage: &R) {
    let users = vec![sample(3), sample(1), sample(2)];
    storage.save(&users).await.unwrap();

    let ids: Vec<u64> = storage.load().await.unwrap().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

async fn test_save_empty<R: UserRepository>(storage: &R) {
    storage.save(&[sample(1)]).await.unwrap();
    storage.save(&[]).await.unwrap();

    assert!(storage.load().await.unwrap().is_empty());
}
