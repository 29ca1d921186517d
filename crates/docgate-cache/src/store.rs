//! Concurrent entry store.

use ahash::RandomState;
use dashmap::DashMap;
use docgate_core::Document;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The cached result of one query.
///
/// Single-row loads cache the optional document (a query that matched no
/// row caches `None`); multi-row loads cache the full document sequence.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Object(Option<Document>),
    Rows(Vec<Document>),
}

/// One cache entry: an immutable result plus its creation and last-hit
/// timestamps.
///
/// The result is never mutated in place; a stale entry is replaced
/// wholesale. Only the last-hit timestamp is updated in place, through an
/// atomic.
#[derive(Debug)]
pub struct CacheEntry {
    value: CachedValue,
    created_at: u64,
    last_hit: AtomicU64,
}

impl CacheEntry {
    pub fn new(value: CachedValue, now: u64) -> Self {
        Self {
            value,
            created_at: now,
            last_hit: AtomicU64::new(now),
        }
    }

    pub fn value(&self) -> &CachedValue {
        &self.value
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn last_hit(&self) -> u64 {
        self.last_hit.load(Ordering::Relaxed)
    }

    /// Record a hit without replacing the entry.
    pub fn touch(&self, now: u64) {
        self.last_hit.store(now, Ordering::Relaxed);
    }

    /// An entry is stale once its age reaches the expiry duration.
    pub fn is_stale(&self, expiry: Duration, now: u64) -> bool {
        u128::from(now.saturating_sub(self.created_at)) >= expiry.as_millis()
    }
}

/// Concurrency-safe mapping from cache key to entry.
///
/// Entries are published fully constructed behind `Arc`; readers never
/// observe a partially built entry.
#[derive(Debug, Default)]
pub struct CacheStore {
    map: DashMap<String, Arc<CacheEntry>, RandomState>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.map.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn put(&self, key: String, entry: Arc<CacheEntry>) {
        self.map.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn remove(&self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    pub fn remove_many(&self, keys: &[String]) -> usize {
        keys.iter().filter(|key| self.remove(key)).count()
    }

    /// Key and last-hit timestamp of every live entry.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        self.map
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().last_hit()))
            .collect()
    }
}
