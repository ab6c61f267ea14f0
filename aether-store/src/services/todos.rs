//! Todos service
//!
//! Business logic for the to-do list.

use crate::database::{ItemType, Repository, Todo};
use crate::error::Result;

/// Service for managing todos
#[derive(Clone)]
pub struct TodosService {
    repo: Repository,
}

impl TodosService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Add a new, not yet completed todo
    pub async fn add_todo(&self, task: &str) -> Result<Todo> {
        tracing::info!("Adding todo: {}", task);
        self.repo.add_todo(task).await
    }

    /// Get a todo by ID
    pub async fn get_todo(&self, id: i64) -> Result<Option<Todo>> {
        self.repo.get_todo_by_id(id).await
    }

    /// List all todos, newest first
    pub async fn list_todos(&self) -> Result<Vec<Todo>> {
        self.repo.get_todos().await
    }

    pub async fn update_todo(&self, id: i64, task: &str, completed: bool) -> Result<()> {
        self.repo.update_todo(id, task, completed).await
    }

    /// Flip the completion flag. Returns the updated todo, or `None` if it
    /// does not exist.
    pub async fn toggle_todo(&self, id: i64) -> Result<Option<Todo>> {
        let Some(mut todo) = self.repo.get_todo_by_id(id).await? else {
            return Ok(None);
        };

        todo.completed = !todo.completed;
        self.repo.update_todo(id, &todo.task, todo.completed).await?;

        tracing::debug!("Toggled todo {} to completed={}", id, todo.completed);
        Ok(Some(todo))
    }

    /// Delete a todo by moving it to the trash. Returns whether anything
    /// was moved.
    pub async fn delete_todo(&self, id: i64) -> Result<bool> {
        tracing::info!("Deleting todo: {}", id);

        let moved = self
            .repo
            .move_to_trash(&id.to_string(), ItemType::Todo)
            .await?
            .is_some();

        Ok(moved)
    }
}
