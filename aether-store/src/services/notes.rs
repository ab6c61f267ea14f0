//! Notes service
//!
//! High-level business logic for notes operations.
//! Opening a note bumps its access time; deleting moves it to the trash.

use crate::database::{ItemType, Note, Repository, SaveNoteRequest};
use crate::error::Result;

/// Service for managing notes
#[derive(Clone)]
pub struct NotesService {
    repo: Repository,
}

impl NotesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a new note with a generated id
    pub async fn create_note(&self, title: String, content: String) -> Result<Note> {
        tracing::info!("Creating new note: {}", title);

        let note = self.repo.save_note(&SaveNoteRequest::draft(title, content)).await?;

        tracing::info!("Note created successfully: {}", note.id);

        Ok(note)
    }

    /// Insert or replace a note. Drafts are saved as the user types, so
    /// empty titles and bodies are accepted.
    pub async fn save_note(&self, req: SaveNoteRequest) -> Result<Note> {
        self.repo.save_note(&req).await
    }

    /// Get a note by ID without touching its access time
    pub async fn get_note(&self, id: &str) -> Result<Option<Note>> {
        self.repo.get_note_by_id(id).await
    }

    /// Open a note for viewing: bump its access time, then return it
    pub async fn open_note(&self, id: &str) -> Result<Option<Note>> {
        self.repo.update_note_last_accessed(id).await?;
        self.repo.get_note_by_id(id).await
    }

    /// List all notes, most recently accessed first
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.repo.get_all_notes().await
    }

    /// The `limit` most recently accessed notes
    pub async fn recent_notes(&self, limit: usize) -> Result<Vec<Note>> {
        let mut notes = self.repo.get_all_notes().await?;
        notes.truncate(limit);
        Ok(notes)
    }

    /// Delete a note by moving it to the trash. Returns whether anything
    /// was moved.
    pub async fn delete_note(&self, id: &str) -> Result<bool> {
        tracing::info!("Deleting note: {}", id);

        let moved = self.repo.move_to_trash(id, ItemType::Note).await?.is_some();

        if moved {
            tracing::info!("Note moved to trash: {}", id);
        }

        Ok(moved)
    }
}
