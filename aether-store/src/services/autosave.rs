//! Debounced draft autosave
//!
//! The editor hands every keystroke's draft to a `DraftAutosaver` instead
//! of writing it directly. A background task keeps only the latest draft
//! and writes it once the editor has been idle for the configured delay,
//! or immediately on `flush` (editor blur) and `close`.

use crate::database::{Note, SaveNoteRequest};
use crate::error::{AppError, Result};
use crate::services::NotesService;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum Command {
    Draft(SaveNoteRequest),
    Flush(oneshot::Sender<Result<Option<Note>>>),
}

/// Handle to a running autosave task
pub struct DraftAutosaver {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl DraftAutosaver {
    /// Start the background writer
    pub fn spawn(notes: NotesService, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(notes, delay, rx));

        tracing::debug!("Draft autosave started with {:?} delay", delay);

        Self { tx, task }
    }

    /// Queue the latest state of a draft, replacing any pending one
    pub fn update(&self, draft: SaveNoteRequest) -> Result<()> {
        self.tx
            .send(Command::Draft(draft))
            .map_err(|_| AppError::Generic("Draft autosave has stopped".to_string()))
    }

    /// Write the pending draft now. Returns the saved note, or `None`
    /// when nothing was pending.
    pub async fn flush(&self) -> Result<Option<Note>> {
        let (ack_tx, ack_rx) = oneshot::channel();

        self.tx
            .send(Command::Flush(ack_tx))
            .map_err(|_| AppError::Generic("Draft autosave has stopped".to_string()))?;

        ack_rx
            .await
            .map_err(|_| AppError::Generic("Draft autosave stopped before flushing".to_string()))?
    }

    /// Write any pending draft and stop the background task
    pub async fn close(self) -> Result<()> {
        drop(self.tx);
        self.task
            .await
            .map_err(|e| AppError::Generic(format!("Draft autosave task failed: {}", e)))
    }
}

async fn run(notes: NotesService, delay: Duration, mut rx: mpsc::UnboundedReceiver<Command>) {
    let mut pending: Option<SaveNoteRequest> = None;

    loop {
        let command = if pending.is_some() {
            match tokio::time::timeout(delay, rx.recv()).await {
                Ok(command) => command,
                Err(_) => {
                    save_logged(&notes, pending.take()).await;
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(Command::Draft(draft)) => {
                // Switching notes must not drop the previous note's edits
                if pending.as_ref().is_some_and(|p| p.id != draft.id) {
                    save_logged(&notes, pending.take()).await;
                }
                pending = Some(draft);
            }
            Some(Command::Flush(ack)) => {
                let saved = save(&notes, pending.take()).await;
                let _ = ack.send(saved);
            }
            None => {
                save_logged(&notes, pending.take()).await;
                tracing::debug!("Draft autosave stopped");
                break;
            }
        }
    }
}

async fn save(notes: &NotesService, draft: Option<SaveNoteRequest>) -> Result<Option<Note>> {
    match draft {
        Some(draft) => notes.save_note(draft).await.map(Some),
        None => Ok(None),
    }
}

async fn save_logged(notes: &NotesService, draft: Option<SaveNoteRequest>) {
    match save(notes, draft).await {
        Ok(Some(note)) => tracing::debug!("Autosaved draft: {}", note.id),
        Ok(None) => {}
        Err(e) => tracing::error!("Failed to autosave draft: {}", e),
    }
}
