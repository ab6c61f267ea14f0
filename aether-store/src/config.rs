//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the store.

// ===== Storage =====

/// File name of the SQLite database inside the data directory
pub const DEFAULT_DATABASE_FILE: &str = "aether.db";

/// File name of the JSON settings document inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Default number of pooled connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Upper bound for pooled connections. SQLite has a single writer, so a
/// large pool only adds lock contention.
pub const MAX_CONNECTIONS_LIMIT: u32 = 32;

/// Default time a connection waits on a locked database before failing
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Maximum busy timeout (1 minute)
pub const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;

// ===== Draft Autosave Limits =====

/// Default debounce delay for draft writes in milliseconds
pub const DEFAULT_AUTO_SAVE_DELAY_MS: u32 = 1_000;

/// Minimum auto-save delay in milliseconds.
/// Values below this cause excessive disk I/O while typing.
pub const MIN_AUTO_SAVE_DELAY_MS: u32 = 100;

/// Maximum auto-save delay in milliseconds (5 minutes).
/// Values above this risk data loss on unexpected shutdown.
pub const MAX_AUTO_SAVE_DELAY_MS: u32 = 300_000;

// ===== Search =====

/// Default number of remembered search terms
pub const DEFAULT_RECENT_SEARCHES: usize = 10;

/// Maximum number of remembered search terms
pub const MAX_RECENT_SEARCHES: usize = 50;

// ===== Recency Buckets =====

/// Milliseconds in one day
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1_000;

/// Items younger than this many days land in "Today"
pub const TODAY_MAX_AGE_DAYS: i64 = 1;

/// Items younger than this many days land in "This week"
pub const WEEK_MAX_AGE_DAYS: i64 = 7;

/// Items younger than this many days land in "This month"
pub const MONTH_MAX_AGE_DAYS: i64 = 30;
