//! TTL cache for merged views.
//!
//! The backing store is injected through [`CacheStore`]; entries are
//! immutable snapshots stamped with their write time, and freshness is
//! judged against the cache's own TTL on every read. Expired entries are
//! simply treated as absent and overwritten by the next recompute.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// One stored snapshot. Read-only after creation.
#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: DateTime<Utc>,
}

/// Key/value store contract the view cache runs on.
///
/// Implementations must tolerate concurrent readers and writers on the same
/// key; last-writer-wins is acceptable since values are immutable snapshots.
pub trait CacheStore<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheEntry<V>>;
    fn set(&self, key: &str, value: V);
}

/// Reference in-memory store.
#[derive(Default)]
pub struct MemoryCacheStore<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V> MemoryCacheStore<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone + Send + Sync> CacheStore<V> for MemoryCacheStore<V> {
    fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.read().expect("cache lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: V) {
        self.entries.write().expect("cache lock poisoned").insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Utc::now(),
            },
        );
    }
}

/// TTL and namespace layer over a [`CacheStore`].
pub struct ViewCache<V> {
    store: Arc<dyn CacheStore<V>>,
    group: String,
    ttl: Duration,
}

impl<V> ViewCache<V> {
    pub fn new(store: Arc<dyn CacheStore<V>>, group: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            group: group.into(),
            ttl,
        }
    }

    pub fn in_memory(group: impl Into<String>, ttl: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        Self::new(Arc::new(MemoryCacheStore::new()), group, ttl)
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}.{}", self.group, key)
    }

    /// Returns the stored value unless its age exceeds the TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.store.get(&self.namespaced(key))?;
        let age = Utc::now() - entry.stored_at;
        if age > self.ttl {
            debug!(group = %self.group, key, "cache entry expired");
            return None;
        }
        Some(entry.value)
    }

    pub fn set(&self, key: &str, value: V) {
        self.store.set(&self.namespaced(key), value);
    }
}
