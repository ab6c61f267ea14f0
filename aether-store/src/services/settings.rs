//! Settings service
//!
//! Manages store settings persistence using JSON file storage.

use crate::config::*;
use crate::database::PoolConfig;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Database file and connection pool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_file")]
    pub database_file: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a connection waits on a locked database, in milliseconds
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

fn default_database_file() -> String {
    DEFAULT_DATABASE_FILE.to_string()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_busy_timeout() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

impl StorageSettings {
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.max_connections,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}

/// Editor behavior settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorSettings {
    /// Auto-save delay in milliseconds (minimum 100ms)
    #[serde(default = "default_auto_save_delay")]
    pub auto_save_delay: u32,
}

fn default_auto_save_delay() -> u32 {
    DEFAULT_AUTO_SAVE_DELAY_MS
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            auto_save_delay: default_auto_save_delay(),
        }
    }
}

/// Search screen settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_recent_searches")]
    pub recent_searches: usize,
}

fn default_recent_searches() -> usize {
    DEFAULT_RECENT_SEARCHES
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            recent_searches: default_recent_searches(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub behavior: BehaviorSettings,
    #[serde(default)]
    pub search: SearchSettings,
}

impl AppSettings {
    /// Check every value against its configured bounds
    pub fn validate(&self) -> Result<()> {
        let db_file = self.storage.database_file.trim();
        if db_file.is_empty() || Path::new(db_file).components().count() != 1 {
            return Err(AppError::Config(format!(
                "database_file must be a plain file name, got {:?}",
                self.storage.database_file
            )));
        }

        if !(1..=MAX_CONNECTIONS_LIMIT).contains(&self.storage.max_connections) {
            return Err(AppError::Config(format!(
                "max_connections must be between 1 and {}",
                MAX_CONNECTIONS_LIMIT
            )));
        }

        if self.storage.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(AppError::Config(format!(
                "busy_timeout_ms must be at most {}",
                MAX_BUSY_TIMEOUT_MS
            )));
        }

        if !(MIN_AUTO_SAVE_DELAY_MS..=MAX_AUTO_SAVE_DELAY_MS).contains(&self.behavior.auto_save_delay) {
            return Err(AppError::Config(format!(
                "auto_save_delay must be between {} and {} ms",
                MIN_AUTO_SAVE_DELAY_MS, MAX_AUTO_SAVE_DELAY_MS
            )));
        }

        if self.search.recent_searches > MAX_RECENT_SEARCHES {
            return Err(AppError::Config(format!(
                "recent_searches must be at most {}",
                MAX_RECENT_SEARCHES
            )));
        }

        Ok(())
    }

    pub fn auto_save_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.behavior.auto_save_delay))
    }
}

/// Service for managing store settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join(SETTINGS_FILE),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !fs::try_exists(&self.settings_path).await? {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate and save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        settings.validate()?;

        let content = serde_json::to_string_pretty(settings)?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Get behavior settings (auto-save delay)
    pub async fn get_behavior(&self) -> Result<BehaviorSettings> {
        let settings = self.load().await?;
        Ok(settings.behavior)
    }

    /// Update behavior settings
    pub async fn update_behavior(&self, behavior: BehaviorSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.behavior = behavior;
        self.save(&settings).await
    }

    /// Get search settings
    pub async fn get_search(&self) -> Result<SearchSettings> {
        let settings = self.load().await?;
        Ok(settings.search)
    }

    /// Update search settings
    pub async fn update_search(&self, search: SearchSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.search = search;
        self.save(&settings).await
    }
}
