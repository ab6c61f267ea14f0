//! Shared search query state
//!
//! The current search query lives in an explicit observable handed to
//! whoever needs it (search box, result lists). Subscribing returns a
//! `Subscription`; dropping or disposing it removes the listener.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Inner {
    query: String,
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// Observable holder of the current search query
#[derive(Clone, Default)]
pub struct SearchQueryState {
    inner: Arc<Mutex<Inner>>,
}

impl SearchQueryState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current query
    pub fn get(&self) -> String {
        self.lock().query.clone()
    }

    /// Replace the query and notify listeners. Setting the same value
    /// again is ignored. Returns whether the value changed.
    pub fn set(&self, query: impl Into<String>) -> bool {
        let query = query.into();

        // Listeners run outside the lock so they may read or subscribe
        let listeners: Vec<Listener> = {
            let mut inner = self.lock();
            if inner.query == query {
                return false;
            }
            inner.query = query.clone();
            inner.listeners.values().cloned().collect()
        };

        tracing::trace!("Search query changed, notifying {} listeners", listeners.len());

        for listener in listeners {
            listener(&query);
        }

        true
    }

    /// Register a listener called with every new query
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Arc::new(listener));

        Subscription {
            id,
            state: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

/// Disposer for a registered listener
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    state: Weak<Mutex<Inner>>,
}

impl Subscription {
    /// Unsubscribe now
    pub fn dispose(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .listeners
                .remove(&self.id);
        }
    }
}
