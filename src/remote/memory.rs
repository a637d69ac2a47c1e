use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Todo;
use crate::remote::TodoStore;

/// In-process collection used offline and in tests. Keeps insertion order.
#[derive(Default)]
pub struct MemoryTodoStore {
    todos: Mutex<Vec<Todo>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with records as-is, assigning ids to those without one.
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        let todos = todos
            .into_iter()
            .map(|mut todo| {
                todo.id.get_or_insert_with(|| Uuid::new_v4().simple().to_string());
                todo
            })
            .collect();
        Self {
            todos: Mutex::new(todos),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Todo>> {
        self.todos.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list_all(&self) -> Result<Vec<Todo>, AppError> {
        Ok(self.lock().clone())
    }

    async fn get(&self, id: &str) -> Result<Todo, AppError> {
        self.lock()
            .iter()
            .find(|t| t.id.as_deref() == Some(id))
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, todo: &Todo) -> Result<Todo, AppError> {
        let created = Todo {
            id: Some(Uuid::new_v4().simple().to_string()),
            ..todo.clone()
        };
        self.lock().push(created.clone());
        Ok(created)
    }

    async fn update(&self, todo: &Todo) -> Result<(), AppError> {
        let id = todo.id.as_deref().ok_or(AppError::NotPersisted)?;
        let mut todos = self.lock();
        let current = todos
            .iter_mut()
            .find(|t| t.id.as_deref() == Some(id))
            .ok_or(AppError::NotFound)?;
        *current = todo.clone();
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), AppError> {
        let mut todos = self.lock();
        let before = todos.len();
        todos.retain(|t| t.id.as_deref() != Some(id));
        if todos.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
