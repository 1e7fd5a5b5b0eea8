//! Time-boxed memoization of read operations

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::fanout::Batch;

/// Identifies one call: operation name plus the serialized filter, if any
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: &'static str,
    filter: Option<String>,
}

impl CacheKey {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            filter: None,
        }
    }

    /// Extend the key with a filter value
    pub fn with_filter<F: Serialize + std::fmt::Debug>(mut self, filter: &F) -> Self {
        self.filter =
            Some(serde_json::to_string(filter).unwrap_or_else(|_| format!("{:?}", filter)));
        self
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.filter {
            Some(filter) => write!(f, "{}{}", self.operation, filter),
            None => write!(f, "{}", self.operation),
        }
    }
}

struct CacheEntry {
    expires_at: Instant,
    value: Arc<dyn Any + Send + Sync>,
}

struct CacheState {
    duration: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

/// Stores batch outcomes, successes and errors alike, for a configurable
/// duration. A zero duration disables storing.
pub struct ResponseCache {
    state: Mutex<CacheState>,
}

impl ResponseCache {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                duration,
                entries: HashMap::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current duration applied to new entries
    pub fn duration(&self) -> Duration {
        self.state().duration
    }

    /// Change the duration for future entries. Existing entries keep the
    /// expiry they were stored with.
    pub fn set_duration(&self, duration: Duration) {
        debug!(?duration, "Setting cache duration");
        self.state().duration = duration;
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.state().entries.clear();
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup<T>(&self, key: &CacheKey) -> Option<Batch<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        let state = self.state();
        let entry = state.entries.get(key)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        entry.value.downcast_ref::<Batch<T>>().cloned()
    }

    fn store<T>(&self, key: CacheKey, outcome: &Batch<T>)
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut state = self.state();
        if state.duration.is_zero() {
            return;
        }
        let expires_at = Instant::now() + state.duration;
        state.entries.insert(
            key,
            CacheEntry {
                expires_at,
                value: Arc::new(outcome.clone()),
            },
        );
    }

    /// Return the stored outcome for `key` while it is fresh, otherwise run
    /// `fetch` and store what it returns
    pub async fn memoize<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Batch<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Batch<T>>,
    {
        if let Some(hit) = self.lookup::<T>(&key) {
            debug!(key = %key, "Using cached response");
            return hit;
        }

        debug!(key = %key, "Cache miss");
        let outcome = fetch().await;
        self.store(key, &outcome);
        outcome
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ResponseCache")
            .field("duration", &state.duration)
            .field("entries", &state.entries.len())
            .finish()
    }
}
