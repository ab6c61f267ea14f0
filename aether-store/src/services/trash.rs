//! Trash service
//!
//! Soft delete staging: deleted notes and todos wait here as snapshots
//! until they are restored or purged. Nothing expires automatically.

use crate::database::{ItemType, Repository, TrashItem, TrashSnapshot, TrashedItem};
use crate::error::Result;

/// Service for the trash workflow
#[derive(Clone)]
pub struct TrashService {
    repo: Repository,
}

impl TrashService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Move a note or todo to the trash. `None` if it does not exist.
    pub async fn move_to_trash(&self, item_id: &str, item_type: ItemType) -> Result<Option<TrashItem>> {
        tracing::info!("Moving {} {} to trash", item_type, item_id);
        self.repo.move_to_trash(item_id, item_type).await
    }

    /// List trash entries, most recently trashed first
    pub async fn list(&self) -> Result<Vec<TrashedItem>> {
        self.repo.get_trashed_items().await
    }

    /// Restore an entry to its origin table
    pub async fn restore(&self, trash_id: i64) -> Result<Option<TrashSnapshot>> {
        tracing::info!("Restoring trash entry: {}", trash_id);

        let restored = self.repo.restore_from_trash(trash_id).await;

        if let Err(e) = &restored {
            tracing::error!("Failed to restore trash entry {}: {}", trash_id, e);
        }

        restored
    }

    /// Purge a single entry
    pub async fn permanently_delete(&self, trash_id: i64) -> Result<()> {
        tracing::info!("Permanently deleting trash entry: {}", trash_id);
        self.repo.permanently_delete(trash_id).await
    }

    /// Number of entries in the trash
    pub async fn count(&self) -> Result<i64> {
        self.repo.count_trashed_items().await
    }

    /// Purge everything in the trash
    pub async fn empty(&self) -> Result<u64> {
        let purged = self.repo.empty_trash().await?;
        tracing::info!("Emptied trash, {} entries purged", purged);
        Ok(purged)
    }
}
