//! Repository layer for database operations
//!
//! This module provides CRUD operations for notes and todos plus the
//! trash (soft delete) workflow. Lookups and deletes of unknown ids are
//! benign no-ops; storage failures propagate as `AppError::Database`.
//! Moving to and restoring from trash each run in a single transaction.

use super::models::*;
use crate::error::Result;
use sqlx::{SqliteConnection, SqlitePool};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or fully replace a note by id
    pub async fn save_note(&self, req: &SaveNoteRequest) -> Result<Note> {
        let mut conn = self.pool.acquire().await?;
        let note = upsert_note(&mut conn, req).await?;

        tracing::debug!("Saved note: {}", note.id);
        Ok(note)
    }

    /// Get a note by ID
    pub async fn get_note_by_id(&self, id: &str) -> Result<Option<Note>> {
        let mut conn = self.pool.acquire().await?;
        fetch_note(&mut conn, id).await
    }

    /// List all notes, most recently accessed first
    pub async fn get_all_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT * FROM notes ORDER BY lastAccessedAt DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    /// Bump a note's access time to now
    pub async fn update_note_last_accessed(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("UPDATE notes SET lastAccessedAt = ? WHERE id = ?")
            .bind(now_millis())
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            tracing::debug!("Access bump skipped, note not found: {}", id);
        }
        Ok(())
    }

    /// Permanently delete a note row
    pub async fn delete_note(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Hard deleted note: {}", id);
        Ok(())
    }

    /// Create a new todo
    pub async fn add_todo(&self, task: &str) -> Result<Todo> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (task, completed, createdAt)
            VALUES (?, 0, ?)
            RETURNING *
            "#,
        )
        .bind(task)
        .bind(now_millis())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created todo: {}", todo.id);
        Ok(todo)
    }

    /// Get a todo by ID
    pub async fn get_todo_by_id(&self, id: i64) -> Result<Option<Todo>> {
        let mut conn = self.pool.acquire().await?;
        fetch_todo(&mut conn, id).await
    }

    /// Replace the mutable fields of a todo
    pub async fn update_todo(&self, id: i64, task: &str, completed: bool) -> Result<()> {
        let rows = sqlx::query("UPDATE todos SET task = ?, completed = ? WHERE id = ?")
            .bind(task)
            .bind(completed)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            tracing::debug!("Update skipped, todo not found: {}", id);
        } else {
            tracing::debug!("Updated todo: {}", id);
        }
        Ok(())
    }

    /// Permanently delete a todo row
    pub async fn delete_todo(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Hard deleted todo: {}", id);
        Ok(())
    }

    /// List all todos, newest first
    pub async fn get_todos(&self) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT * FROM todos ORDER BY createdAt DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    /// Move a note or todo into the trash.
    ///
    /// Deletes the origin row, stores its snapshot and commits as one
    /// transaction. Returns `None` (and writes nothing) when the entity
    /// does not exist.
    pub async fn move_to_trash(&self, item_id: &str, item_type: ItemType) -> Result<Option<TrashItem>> {
        let mut tx = self.pool.begin().await?;

        // The first statement writes, so the transaction holds the write
        // lock before reading anything and waits out concurrent writers.
        let snapshot = match item_type {
            ItemType::Note => sqlx::query_as::<_, Note>("DELETE FROM notes WHERE id = ? RETURNING *")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?
                .map(TrashSnapshot::Note),
            ItemType::Todo => match item_id.parse::<i64>() {
                Ok(id) => sqlx::query_as::<_, Todo>("DELETE FROM todos WHERE id = ? RETURNING *")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .map(TrashSnapshot::Todo),
                Err(_) => None,
            },
        };

        let Some(snapshot) = snapshot else {
            tracing::debug!("Nothing to trash, {} not found: {}", item_type, item_id);
            return Ok(None);
        };

        let item = sqlx::query_as::<_, TrashItem>(
            r#"
            INSERT INTO trash (item_id, item_type, item_data, trashedAt)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(snapshot.item_id())
        .bind(item_type)
        .bind(snapshot.to_json()?)
        .bind(now_millis())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Moved {} {} to trash entry {}", item_type, item_id, item.id);
        Ok(Some(item))
    }

    /// Get a raw trash row by ID
    pub async fn get_trash_item(&self, trash_id: i64) -> Result<Option<TrashItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_trash_item(&mut conn, trash_id).await
    }

    /// List trash entries, most recently trashed first
    pub async fn get_trashed_items(&self) -> Result<Vec<TrashedItem>> {
        let items = sqlx::query_as::<_, TrashItem>(
            r#"
            SELECT * FROM trash ORDER BY trashedAt DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items
            .into_iter()
            .map(|item| TrashedItem {
                title: display_title(&item),
                id: item.id,
                item_id: item.item_id,
                item_type: item.item_type,
                trashed_at: item.trashed_at,
            })
            .collect())
    }

    /// Restore a trash entry into its origin table.
    ///
    /// The snapshot is re-inserted through the normal upsert path and the
    /// trash row removed in one transaction. A malformed snapshot fails
    /// with `AppError::MalformedSnapshot` and leaves the trash row in place.
    /// Returns `None` when the trash entry does not exist.
    pub async fn restore_from_trash(&self, trash_id: i64) -> Result<Option<TrashSnapshot>> {
        let mut tx = self.pool.begin().await?;

        // Write first so the transaction holds the write lock throughout
        let Some(item) = sqlx::query_as::<_, TrashItem>("DELETE FROM trash WHERE id = ? RETURNING *")
            .bind(trash_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tracing::debug!("Nothing to restore, trash entry not found: {}", trash_id);
            return Ok(None);
        };

        // Dropping the transaction on error rolls the delete back
        let snapshot = item.snapshot()?;

        match &snapshot {
            TrashSnapshot::Note(note) => {
                upsert_note(&mut tx, &SaveNoteRequest::from(note.clone())).await?;
            }
            TrashSnapshot::Todo(todo) => {
                upsert_todo(&mut tx, todo).await?;
            }
        }

        tx.commit().await?;

        tracing::debug!(
            "Restored {} {} from trash entry {}",
            item.item_type,
            item.item_id,
            trash_id
        );
        Ok(Some(snapshot))
    }

    /// Remove a trash entry for good
    pub async fn permanently_delete(&self, trash_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM trash WHERE id = ?")
            .bind(trash_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Permanently deleted trash entry: {}", trash_id);
        Ok(())
    }

    /// Count entries waiting in the trash
    pub async fn count_trashed_items(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trash")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Purge every trash entry, returning how many were removed
    pub async fn empty_trash(&self) -> Result<u64> {
        let rows = sqlx::query("DELETE FROM trash")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!("Emptied trash: {} entries purged", rows);
        Ok(rows)
    }

    /// Wipe notes, todos and trash
    pub async fn clear_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for table in ["notes", "todos", "trash"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("Cleared all notes, todos and trash");
        Ok(())
    }
}

async fn fetch_note(conn: &mut SqliteConnection, id: &str) -> Result<Option<Note>> {
    let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(note)
}

async fn fetch_todo(conn: &mut SqliteConnection, id: i64) -> Result<Option<Todo>> {
    let todo = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(todo)
}

async fn fetch_trash_item(conn: &mut SqliteConnection, id: i64) -> Result<Option<TrashItem>> {
    let item = sqlx::query_as::<_, TrashItem>("SELECT * FROM trash WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(item)
}

async fn upsert_note(conn: &mut SqliteConnection, req: &SaveNoteRequest) -> Result<Note> {
    // Zero counts as "never accessed" and is stamped like a missing value
    let last_accessed_at = req
        .last_accessed_at
        .filter(|ts| *ts != 0)
        .unwrap_or_else(now_millis);

    let note = sqlx::query_as::<_, Note>(
        r#"
        INSERT INTO notes (id, title, content, createdAt, lastAccessedAt)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            content = excluded.content,
            createdAt = excluded.createdAt,
            lastAccessedAt = excluded.lastAccessedAt
        RETURNING *
        "#,
    )
    .bind(&req.id)
    .bind(&req.title)
    .bind(&req.content)
    .bind(req.created_at)
    .bind(last_accessed_at)
    .fetch_one(conn)
    .await?;

    Ok(note)
}

async fn upsert_todo(conn: &mut SqliteConnection, todo: &Todo) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO todos (id, task, completed, createdAt)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            task = excluded.task,
            completed = excluded.completed,
            createdAt = excluded.createdAt
        "#,
    )
    .bind(todo.id)
    .bind(&todo.task)
    .bind(todo.completed)
    .bind(todo.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Pull the display title out of a snapshot without decoding the whole entity
fn display_title(item: &TrashItem) -> String {
    let key = match item.item_type {
        ItemType::Note => "title",
        ItemType::Todo => "task",
    };

    let title = serde_json::from_str::<serde_json::Value>(&item.item_data)
        .ok()
        .and_then(|data| data.get(key).and_then(|v| v.as_str()).map(str::to_owned));

    match title {
        Some(title) => title,
        None => {
            tracing::warn!("Trash entry {} has no readable {}", item.id, key);
            String::new()
        }
    }
}
