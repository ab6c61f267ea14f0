//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde for serialization to the UI layer. Column and JSON
//! names follow the persisted layout (`createdAt`, `lastAccessedAt`, ...).

use crate::error::{AppError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Current time as epoch milliseconds, the unit of every stored timestamp
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A note with free text content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    /// Bumped every time the note is opened
    pub last_accessed_at: i64,
}

impl Note {
    /// Generate a fresh note id: creation timestamp plus a random suffix
    pub fn generate_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}-{}", now_millis(), &suffix[..8])
    }
}

/// Save (upsert) note request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteRequest {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    /// Defaults to the current time when absent (or zero)
    #[serde(default)]
    pub last_accessed_at: Option<i64>,
}

impl SaveNoteRequest {
    /// Start a new draft with a generated id, stamped now
    pub fn draft(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Note::generate_id(),
            title: title.into(),
            content: content.into(),
            created_at: now_millis(),
            last_accessed_at: None,
        }
    }
}

impl From<Note> for SaveNoteRequest {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            last_accessed_at: Some(note.last_accessed_at),
        }
    }
}

/// A to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub task: String,
    pub completed: bool,
    pub created_at: i64,
}

/// Kind of entity a trash entry or search result refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ItemType {
    Note,
    Todo,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Note => "note",
            ItemType::Todo => "todo",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "note" => Ok(ItemType::Note),
            "todo" => Ok(ItemType::Todo),
            other => Err(AppError::UnknownItemType(other.to_string())),
        }
    }
}

/// Raw trash row: a serialized snapshot of a deleted note or todo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrashItem {
    pub id: i64,
    /// Original note id, or todo id rendered as text
    pub item_id: String,
    pub item_type: ItemType,
    /// JSON snapshot of the entity at the moment of deletion
    pub item_data: String,
    #[serde(rename = "trashedAt")]
    #[sqlx(rename = "trashedAt")]
    pub trashed_at: i64,
}

impl TrashItem {
    /// Decode the stored snapshot according to `item_type`
    pub fn snapshot(&self) -> Result<TrashSnapshot> {
        let decoded = match self.item_type {
            ItemType::Note => serde_json::from_str(&self.item_data).map(TrashSnapshot::Note),
            ItemType::Todo => serde_json::from_str(&self.item_data).map(TrashSnapshot::Todo),
        };

        decoded.map_err(|source| AppError::MalformedSnapshot {
            trash_id: self.id,
            source,
        })
    }
}

/// Trash entry prepared for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashedItem {
    pub id: i64,
    pub item_id: String,
    pub item_type: ItemType,
    /// Note title or todo task
    pub title: String,
    pub trashed_at: i64,
}

/// A decoded trash snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrashSnapshot {
    Note(Note),
    Todo(Todo),
}

impl TrashSnapshot {
    pub fn item_type(&self) -> ItemType {
        match self {
            TrashSnapshot::Note(_) => ItemType::Note,
            TrashSnapshot::Todo(_) => ItemType::Todo,
        }
    }

    pub fn item_id(&self) -> String {
        match self {
            TrashSnapshot::Note(note) => note.id.clone(),
            TrashSnapshot::Todo(todo) => todo.id.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let json = match self {
            TrashSnapshot::Note(note) => serde_json::to_string(note)?,
            TrashSnapshot::Todo(todo) => serde_json::to_string(todo)?,
        };
        Ok(json)
    }
}

/// Identifier of the entity a search result came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceId {
    Note(String),
    Todo(i64),
}

/// A note or todo matching a search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: SourceId,
    /// Note title or todo task
    pub name: String,
    /// Note content; empty for todos
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed_at: Option<i64>,
}

impl From<Note> for SearchResult {
    fn from(note: Note) -> Self {
        Self {
            id: SourceId::Note(note.id),
            name: note.title,
            description: note.content,
            item_type: ItemType::Note,
            created_at: note.created_at,
            last_accessed_at: Some(note.last_accessed_at),
        }
    }
}

impl From<Todo> for SearchResult {
    fn from(todo: Todo) -> Self {
        Self {
            id: SourceId::Todo(todo.id),
            name: todo.task,
            description: String::new(),
            item_type: ItemType::Todo,
            created_at: todo.created_at,
            last_accessed_at: None,
        }
    }
}
