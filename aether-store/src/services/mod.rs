//! Services module
//!
//! Business logic services that coordinate between callers and the repository.

pub mod autosave;
pub mod notes;
pub mod query_state;
pub mod recency;
pub mod search;
pub mod settings;
pub mod todos;
pub mod trash;

pub use autosave::DraftAutosaver;
pub use notes::NotesService;
pub use query_state::{SearchQueryState, Subscription};
pub use recency::{group_by_recency, RecencyBucket, RecencyGroup, Timestamped};
pub use search::{RecentSearches, SearchOutcome, SearchService};
pub use settings::{AppSettings, SettingsService};
pub use todos::TodosService;
pub use trash::TrashService;
