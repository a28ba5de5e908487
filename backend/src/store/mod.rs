//! Persistence for Todo records.
//!
//! Every store validates through [`Todo::new`] and [`Todo::apply`], so the
//! schema rules hold no matter which backend is plugged in.

use async_trait::async_trait;
use thiserror::Error;
use todo_shared::{CreateTodoRequest, Todo, UpdateTodoRequest, ValidationError};
use uuid::Uuid;

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("todo not found")]
    NotFound,
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("corrupt todo document: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// Round-trips to the backend; used to fail fast at startup.
    async fn ping(&self) -> StoreResult<()>;

    async fn create(&self, request: CreateTodoRequest) -> StoreResult<Todo>;

    /// All records, newest `created_at` first.
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    async fn get(&self, id: Uuid) -> StoreResult<Todo>;

    /// Applies only the fields present in `patch`, then re-validates.
    async fn update(&self, id: Uuid, patch: UpdateTodoRequest) -> StoreResult<Todo>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}
