//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::database::{create_pool_with, Repository};
use crate::error::Result;
use crate::services::{
    AppSettings, DraftAutosaver, NotesService, SearchQueryState, SearchService, SettingsService,
    TodosService, TrashService,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, falling back to debug output for this crate. Safe to
/// call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aether_store=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub settings: AppSettings,
    pub settings_service: SettingsService,
    pub notes_service: NotesService,
    pub todos_service: TodosService,
    pub trash_service: TrashService,
    pub search_service: SearchService,
    pub search_query: SearchQueryState,
    repo: Repository,
}

impl AppState {
    /// Open the store under `data_dir` and wire up every service.
    ///
    /// Fails if the directory, settings, database or schema cannot be set
    /// up; callers should halt startup and show a blocking error.
    pub async fn initialize(data_dir: PathBuf) -> Result<Self> {
        tracing::info!("Initializing store");
        tracing::info!("Data directory: {:?}", data_dir);

        tokio::fs::create_dir_all(&data_dir).await?;

        let settings_service = SettingsService::new(data_dir.clone());
        let settings = settings_service.load().await?;

        let db_path = data_dir.join(&settings.storage.database_file);
        let pool = create_pool_with(&db_path, settings.storage.pool_config()).await?;
        let repo = Repository::new(pool);

        let state = Self {
            notes_service: NotesService::new(repo.clone()),
            todos_service: TodosService::new(repo.clone()),
            trash_service: TrashService::new(repo.clone()),
            search_service: SearchService::new(repo.clone(), settings.search.recent_searches),
            search_query: SearchQueryState::new(),
            settings_service,
            settings,
            data_dir,
            repo,
        };

        tracing::info!("Store initialized successfully");

        Ok(state)
    }

    /// Start a debounced draft writer using the configured delay
    pub fn draft_autosaver(&self) -> DraftAutosaver {
        DraftAutosaver::spawn(self.notes_service.clone(), self.settings.auto_save_delay())
    }

    /// Erase all notes, todos, trash and remembered searches
    pub async fn reset_app_data(&self) -> Result<()> {
        tracing::info!("Resetting all app data");

        self.repo.clear_all().await?;
        self.search_service.clear_recent_searches();
        self.search_query.set(String::new());

        Ok(())
    }
}
