//! Process-lifetime caches for fetched invite data.
//!
//! Entries are written once and never updated or evicted. Concurrent misses on
//! the same key share one in-flight fetch; a failed fetch leaves nothing behind.

use crate::model::InviteRecord;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;

/// Unbounded insert-if-absent cache keyed by string
pub struct FetchCache<V> {
    name: &'static str,
    entries: Mutex<HashMap<String, Arc<OnceCell<V>>>>,
}

impl<V: Clone> FetchCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceCell<V>>>> {
        // cells are only ever inserted or removed whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cell(&self, key: &str) -> Arc<OnceCell<V>> {
        self.entries()
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Cached value for `key`, if a fetch for it has completed
    pub fn get(&self, key: &str) -> Option<V> {
        self.entries().get(key).and_then(|cell| cell.get().cloned())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries()
            .get(key)
            .is_some_and(|cell| cell.initialized())
    }

    /// Number of populated entries
    pub fn len(&self) -> usize {
        self.entries()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached value for `key`, running `fetch` on a miss.
    ///
    /// While one fetch for `key` is running, other callers wait for it instead
    /// of starting their own. If it fails or is dropped mid-flight, the error
    /// goes to the caller that ran it and the next waiter (if any) tries again;
    /// with no waiters left the empty entry is removed.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.cell(key);
        if let Some(value) = cell.get() {
            log::debug!("{} cache hit for {}", self.name, key);
            return Ok(value.clone());
        }

        let _guard = EmptyCellGuard {
            cache: self,
            key,
            cell: &cell,
        };
        let result = cell
            .get_or_try_init(|| {
                log::debug!("{} cache miss for {}", self.name, key);
                fetch()
            })
            .await
            .cloned();
        result
    }

    fn forget_empty(&self, key: &str, cell: &Arc<OnceCell<V>>) {
        let mut entries = self.entries();
        let stale = entries.get(key).is_some_and(|existing| {
            // the map and this call hold the only references: nobody else is waiting on it
            Arc::ptr_eq(existing, cell) && !existing.initialized() && Arc::strong_count(cell) == 2
        });
        if stale {
            entries.remove(key);
        }
    }
}

/// Drops the entry for `key` if it is still empty once this caller is done
/// with it, whether the fetch failed or the caller was cancelled.
struct EmptyCellGuard<'a, V: Clone> {
    cache: &'a FetchCache<V>,
    key: &'a str,
    cell: &'a Arc<OnceCell<V>>,
}

impl<V: Clone> Drop for EmptyCellGuard<'_, V> {
    fn drop(&mut self) {
        self.cache.forget_empty(self.key, self.cell);
    }
}

/// The two caches a renderer reads through.
///
/// Construct once and share via `Arc` between renderers that should see the
/// same entries; tests build a fresh one per case.
pub struct RenderCaches {
    /// Invite code -> invite record
    pub invites: FetchCache<Arc<InviteRecord>>,
    /// Icon id -> base64 image bytes
    pub icons: FetchCache<Arc<str>>,
}

impl RenderCaches {
    pub fn new() -> Self {
        Self {
            invites: FetchCache::new("invite"),
            icons: FetchCache::new("icon"),
        }
    }
}

impl Default for RenderCaches {
    fn default() -> Self {
        Self::new()
    }
}
