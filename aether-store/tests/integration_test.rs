//! Integration tests for the Aether store
//!
//! These tests verify end-to-end functionality against a file database:
//! - Note and todo CRUD
//! - Trash move, restore and purge
//! - Search with recency grouping
//! - Reopening an existing store
//! - Concurrent writers sharing one pool

use aether_store::database::{create_pool, ItemType, Repository, SaveNoteRequest, SourceId, TrashSnapshot};
use aether_store::services::{NotesService, RecencyBucket, SearchService, TodosService, TrashService};
use aether_store::{init_logging, AppState};
use tempfile::TempDir;

const DAY: i64 = 24 * 60 * 60 * 1_000;

/// Helper to create a test database with schema
async fn create_test_db() -> (Repository, TempDir) {
    init_logging();

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let pool = create_pool(&db_path).await.unwrap();
    let repo = Repository::new(pool);

    (repo, temp_dir)
}

#[tokio::test]
async fn test_note_crud_operations() {
    let (repo, _temp) = create_test_db().await;
    let notes_service = NotesService::new(repo.clone());
    let trash_service = TrashService::new(repo);

    // Create note
    let note = notes_service
        .create_note("Test Note".to_string(), "Hello".to_string())
        .await
        .unwrap();

    assert_eq!(note.title, "Test Note");
    assert!(!note.id.is_empty());

    // Read note
    let retrieved = notes_service.get_note(&note.id).await.unwrap().unwrap();
    assert_eq!(retrieved, note);

    // Edit via upsert
    let mut edited = SaveNoteRequest::from(note.clone());
    edited.title = "Updated Title".to_string();
    notes_service.save_note(edited).await.unwrap();

    let notes = notes_service.list_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Updated Title");
    assert_eq!(notes[0].created_at, note.created_at);

    // Delete moves to trash
    assert!(notes_service.delete_note(&note.id).await.unwrap());
    assert!(notes_service.get_note(&note.id).await.unwrap().is_none());

    let trashed = trash_service.list().await.unwrap();
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0].title, "Updated Title");
    assert_eq!(trashed[0].item_id, note.id);
}

#[tokio::test]
async fn test_trash_restore_and_purge() {
    let (repo, _temp) = create_test_db().await;
    let notes_service = NotesService::new(repo.clone());
    let todos_service = TodosService::new(repo.clone());
    let trash_service = TrashService::new(repo);

    let note = notes_service
        .create_note("Recipe".to_string(), "Flour, eggs".to_string())
        .await
        .unwrap();
    let todo = todos_service.add_todo("Buy flour").await.unwrap();

    notes_service.delete_note(&note.id).await.unwrap();
    todos_service.delete_todo(todo.id).await.unwrap();

    let trashed = trash_service.list().await.unwrap();
    assert_eq!(trashed.len(), 2);

    let note_entry = trashed.iter().find(|t| t.item_type == ItemType::Note).unwrap();
    let todo_entry = trashed.iter().find(|t| t.item_type == ItemType::Todo).unwrap();

    // Restore the note, purge the todo
    let restored = trash_service.restore(note_entry.id).await.unwrap();
    assert_eq!(restored, Some(TrashSnapshot::Note(note.clone())));
    trash_service.permanently_delete(todo_entry.id).await.unwrap();

    assert_eq!(notes_service.get_note(&note.id).await.unwrap(), Some(note));
    assert!(todos_service.list_todos().await.unwrap().is_empty());
    assert_eq!(trash_service.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_search_functionality() {
    let (repo, _temp) = create_test_db().await;
    let search_service = SearchService::new(repo.clone(), 5);
    let todos_service = TodosService::new(repo.clone());

    let now = 1_000 * DAY;
    for (id, title, content, age) in [
        ("shopping", "Shopping List", "Buy milk", DAY / 2),
        ("meeting", "Meeting Notes", "Discuss project", 3 * DAY),
        ("ideas", "Ideas", "Project dashboard", 40 * DAY),
    ] {
        repo.save_note(&SaveNoteRequest {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: now - age,
            last_accessed_at: Some(now - age),
        })
        .await
        .unwrap();
    }
    todos_service.add_todo("Fix PROJECT build").await.unwrap();

    // Search by title
    let results = search_service.search("shopping").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, SourceId::Note("shopping".to_string()));

    // Search by content, across notes and todos
    let results = search_service.search("project").await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[2].item_type, ItemType::Todo);

    // No matches and blank queries
    assert!(search_service.search("nonexistent").await.unwrap().is_empty());
    assert!(search_service.search("").await.unwrap().is_empty());

    // Grouped by age: the todo was created just now (far after `now`),
    // so it counts as Today
    let groups = search_service.search_grouped("project", now).await.unwrap();
    let buckets: Vec<RecencyBucket> = groups.iter().map(|g| g.bucket).collect();
    assert_eq!(
        buckets,
        vec![RecencyBucket::Today, RecencyBucket::ThisWeek, RecencyBucket::Older]
    );
}

#[tokio::test]
async fn test_reopen_existing_store() {
    init_logging();

    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_path_buf();

    let note_id = {
        let state = AppState::initialize(data_dir.clone()).await.unwrap();
        let autosaver = state.draft_autosaver();

        let draft = SaveNoteRequest::draft("Persisted", "across restarts");
        let note_id = draft.id.clone();
        autosaver.update(draft).unwrap();
        autosaver.close().await.unwrap();

        state.todos_service.add_todo("Still here").await.unwrap();
        note_id
    };

    let state = AppState::initialize(data_dir).await.unwrap();

    let note = state.notes_service.open_note(&note_id).await.unwrap().unwrap();
    assert_eq!(note.title, "Persisted");
    assert!(note.last_accessed_at >= note.created_at);

    let todos = state.todos_service.list_todos().await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].task, "Still here");
}

#[tokio::test]
async fn test_clear_all_through_app_state() {
    let temp_dir = TempDir::new().unwrap();
    let state = AppState::initialize(temp_dir.path().to_path_buf()).await.unwrap();

    let note = state
        .notes_service
        .create_note("A".to_string(), String::new())
        .await
        .unwrap();
    state.notes_service.create_note("B".to_string(), String::new()).await.unwrap();
    state.todos_service.add_todo("C").await.unwrap();
    state.notes_service.delete_note(&note.id).await.unwrap();

    state.reset_app_data().await.unwrap();

    assert!(state.notes_service.list_notes().await.unwrap().is_empty());
    assert!(state.todos_service.list_todos().await.unwrap().is_empty());
    assert!(state.trash_service.list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_trash_moves_all_succeed() {
    let (repo, _temp) = create_test_db().await;

    let mut ids = Vec::new();
    for i in 0..40 {
        let note = repo
            .save_note(&SaveNoteRequest::draft(&format!("Note {}", i), "body"))
            .await
            .unwrap();
        ids.push(note.id);
    }

    let handles: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.move_to_trash(&id, ItemType::Note).await })
        })
        .collect();

    for handle in handles {
        let moved = handle.await.unwrap().unwrap();
        assert!(moved.is_some());
    }

    assert_eq!(repo.count_trashed_items().await.unwrap(), 40);
    assert!(repo.get_all_notes().await.unwrap().is_empty());

    // And back again, all at once
    let trash_ids: Vec<i64> = repo.get_trashed_items().await.unwrap().iter().map(|t| t.id).collect();
    let handles: Vec<_> = trash_ids
        .into_iter()
        .map(|trash_id| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.restore_from_trash(trash_id).await })
        })
        .collect();

    for handle in handles {
        let restored = handle.await.unwrap().unwrap();
        assert!(restored.is_some());
    }

    assert_eq!(repo.count_trashed_items().await.unwrap(), 0);
    assert_eq!(repo.get_all_notes().await.unwrap().len(), 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_trash_of_same_note_moves_it_once() {
    let (repo, _temp) = create_test_db().await;
    let note = repo
        .save_note(&SaveNoteRequest::draft("Contended", ""))
        .await
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repo = repo.clone();
            let id = note.id.clone();
            tokio::spawn(async move { repo.move_to_trash(&id, ItemType::Note).await })
        })
        .collect();

    let mut moved = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_some() {
            moved += 1;
        }
    }

    assert_eq!(moved, 1);
    assert_eq!(repo.count_trashed_items().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_last_write_wins() {
    let (repo, _temp) = create_test_db().await;
    let base = SaveNoteRequest::draft("v0", "");

    let handles: Vec<_> = (1..=20)
        .map(|i| {
            let repo = repo.clone();
            let mut req = base.clone();
            req.title = format!("v{}", i);
            tokio::spawn(async move { repo.save_note(&req).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Every write landed as a full row; exactly one of them is left standing
    let notes = repo.get_all_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    let version: u32 = notes[0].title.trim_start_matches('v').parse().unwrap();
    assert!((1..=20).contains(&version));

    // A later write replaces whatever won the race
    let mut last = base.clone();
    last.title = "final".to_string();
    repo.save_note(&last).await.unwrap();
    assert_eq!(repo.get_note_by_id(&base.id).await.unwrap().unwrap().title, "final");
}
