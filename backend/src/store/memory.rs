use async_trait::async_trait;
use chrono::Utc;
use todo_shared::{CreateTodoRequest, Todo, UpdateTodoRequest};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreResult, TodoStore};

/// Process-local store. Records are kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create(&self, request: CreateTodoRequest) -> StoreResult<Todo> {
        let mut todos = self.todos.write().await;
        let todo = Todo::new(request, Utc::now())?;
        todos.push(todo.clone());
        Ok(todo)
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        // Reverse first so equal timestamps still come out newest-inserted first.
        let mut listed: Vec<Todo> = todos.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Todo> {
        let todos = self.todos.read().await;
        todos
            .iter()
            .find(|todo| todo.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: Uuid, patch: UpdateTodoRequest) -> StoreResult<Todo> {
        let mut todos = self.todos.write().await;
        let slot = todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(StoreError::NotFound)?;
        let updated = slot.apply(&patch, Utc::now())?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut todos = self.todos.write().await;
        let index = todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(StoreError::NotFound)?;
        todos.remove(index);
        Ok(())
    }
}
