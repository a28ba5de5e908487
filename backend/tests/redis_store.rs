//! Integration tests for `RedisStore` against a real Redis.
//!
//! Docker must be running: each test starts its own Redis container.

use std::collections::HashSet;

use redis::AsyncCommands;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::{Redis, REDIS_PORT};
use todo_backend::{RedisStore, StoreError, TodoStore};
use todo_shared::{CreateTodoRequest, Priority, UpdateTodoRequest, ValidationError};
use uuid::Uuid;

/// Returns the container too; dropping it stops Redis.
async fn setup_store() -> (ContainerAsync<Redis>, RedisStore, String) {
    let container = Redis::default()
        .start()
        .await
        .expect("Failed to start redis container");
    let port = container
        .get_host_port_ipv4(REDIS_PORT)
        .await
        .expect("Failed to get redis port");

    let url = format!("redis://127.0.0.1:{port}");
    let store = RedisStore::connect(&url)
        .await
        .expect("Failed to connect to redis");
    (container, store, url)
}

async fn raw_connection(url: &str) -> redis::aio::MultiplexedConnection {
    redis::Client::open(url)
        .unwrap()
        .get_multiplexed_tokio_connection()
        .await
        .unwrap()
}

fn titled(title: &str) -> CreateTodoRequest {
    CreateTodoRequest {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn lifecycle_round_trip() {
    let (_container, store, _url) = setup_store().await;
    assert!(store.list().await.unwrap().is_empty());

    let first = store.create(titled("redis first")).await.unwrap();
    let second = store.create(titled("redis second")).await.unwrap();
    assert_eq!(first.priority, Priority::Medium);

    let listed = store.list().await.unwrap();
    assert_eq!(
        listed.iter().map(|t| t.id).collect::<Vec<_>>(),
        [second.id, first.id]
    );

    let updated = store
        .update(
            first.id,
            UpdateTodoRequest {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "redis first");
    assert_eq!(updated.created_at, first.created_at);
    assert_eq!(store.get(first.id).await.unwrap(), updated);

    let invalid = store
        .update(
            first.id,
            UpdateTodoRequest {
                title: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        invalid,
        StoreError::Validation(ValidationError::TitleRequired)
    ));
    assert_eq!(store.get(first.id).await.unwrap(), updated);

    store.delete(first.id).await.unwrap();
    assert!(matches!(store.get(first.id).await, Err(StoreError::NotFound)));
    assert_eq!(
        store.list().await.unwrap().iter().map(|t| t.id).collect::<Vec<_>>(),
        [second.id]
    );
}

#[tokio::test]
async fn rapid_creates_list_in_reverse_creation_order() {
    let (_container, store, _url) = setup_store().await;

    let mut created = Vec::new();
    for i in 0..50 {
        created.push(store.create(titled(&format!("todo {i}"))).await.unwrap());
    }

    let listed: Vec<Uuid> = store.list().await.unwrap().iter().map(|t| t.id).collect();
    let expected: Vec<Uuid> = created.iter().rev().map(|t| t.id).collect();
    assert_eq!(listed, expected);
    assert_eq!(store.list().await.unwrap().len(), 50);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let (_container, store, _url) = setup_store().await;

    let id = Uuid::new_v4();
    assert!(matches!(store.get(id).await, Err(StoreError::NotFound)));
    assert!(matches!(
        store.update(id, UpdateTodoRequest::default()).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(store.delete(id).await, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn update_after_delete_does_not_recreate() {
    let (_container, store, url) = setup_store().await;
    let todo = store.create(titled("short lived")).await.unwrap();
    store.delete(todo.id).await.unwrap();

    let patch = UpdateTodoRequest {
        completed: Some(true),
        ..Default::default()
    };
    assert!(matches!(
        store.update(todo.id, patch).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(store.delete(todo.id).await, Err(StoreError::NotFound)));

    let mut conn = raw_connection(&url).await;
    let exists: bool = conn.exists(format!("todo:{}", todo.id)).await.unwrap();
    assert!(!exists);
}

#[tokio::test]
async fn delete_clears_the_index() {
    let (_container, store, url) = setup_store().await;
    let kept = store.create(titled("kept")).await.unwrap();
    let gone = store.create(titled("gone")).await.unwrap();
    store.delete(gone.id).await.unwrap();

    let mut conn = raw_connection(&url).await;
    let members: Vec<String> = conn.zrange("todos:by_created", 0, -1).await.unwrap();
    assert_eq!(members.len(), 1);
    assert!(members[0].ends_with(&kept.id.to_string()));

    let indexed: HashSet<String> = conn.hkeys("todos:members").await.unwrap();
    assert_eq!(indexed, HashSet::from([kept.id.to_string()]));
}
