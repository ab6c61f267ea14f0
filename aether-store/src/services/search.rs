//! Search service
//!
//! Case-insensitive substring search across notes and todos, plus a
//! small in-memory list of recently searched terms.

use crate::config::DEFAULT_RECENT_SEARCHES;
use crate::database::{Repository, SearchResult};
use crate::error::Result;
use crate::services::recency::{group_by_recency, RecencyGroup};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Most-recent-first list of distinct search terms with a fixed capacity
#[derive(Debug, Clone)]
pub struct RecentSearches {
    terms: VecDeque<String>,
    capacity: usize,
}

impl RecentSearches {
    pub fn new(capacity: usize) -> Self {
        Self {
            terms: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Remember a term. Repeats move to the front instead of duplicating;
    /// comparison ignores case and surrounding whitespace.
    pub fn record(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() || self.capacity == 0 {
            return;
        }

        let lowered = term.to_lowercase();
        self.terms.retain(|t| t.to_lowercase() != lowered);
        self.terms.push_front(term.to_string());
        self.terms.truncate(self.capacity);
    }

    pub fn terms(&self) -> Vec<String> {
        self.terms.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_SEARCHES)
    }
}

/// Outcome of a search box interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum SearchOutcome {
    /// Blank query: the remembered terms
    Recent(Vec<String>),
    Results(Vec<SearchResult>),
}

/// Service for searching notes and todos
#[derive(Clone)]
pub struct SearchService {
    repo: Repository,
    recent: Arc<Mutex<RecentSearches>>,
}

impl SearchService {
    pub fn new(repo: Repository, recent_capacity: usize) -> Self {
        Self {
            repo,
            recent: Arc::new(Mutex::new(RecentSearches::new(recent_capacity))),
        }
    }

    /// Search notes (title or content) and todos (task).
    ///
    /// A blank query yields no results. Matches come back notes first, in
    /// the store's listing order, then todos; nothing is ranked.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        // Surrounding whitespace is part of the substring being matched
        let needle = query.to_lowercase();

        let notes = self.repo.get_all_notes().await?;
        let todos = self.repo.get_todos().await?;

        let note_results = notes
            .into_iter()
            .filter(|note| {
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            })
            .map(SearchResult::from);

        let todo_results = todos
            .into_iter()
            .filter(|todo| todo.task.to_lowercase().contains(&needle))
            .map(SearchResult::from);

        let results: Vec<SearchResult> = note_results.chain(todo_results).collect();

        tracing::debug!("Search for {:?} matched {} items", query, results.len());
        Ok(results)
    }

    /// Search and bucket the results by age relative to `now` (epoch ms)
    pub async fn search_grouped(&self, query: &str, now: i64) -> Result<Vec<RecencyGroup<SearchResult>>> {
        let results = self.search(query).await?;
        Ok(group_by_recency(now, results))
    }

    /// Blank query returns the remembered terms; anything else runs a
    /// search and remembers the term.
    pub async fn search_or_recent(&self, query: &str) -> Result<SearchOutcome> {
        if query.trim().is_empty() {
            return Ok(SearchOutcome::Recent(self.recent_searches()));
        }

        let results = self.search(query).await?;
        self.record_search(query);

        Ok(SearchOutcome::Results(results))
    }

    pub fn record_search(&self, term: &str) {
        self.recent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .record(term);
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.recent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .terms()
    }

    pub fn clear_recent_searches(&self) {
        self.recent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}
