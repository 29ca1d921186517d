//! Per-key mutual exclusion.

use ahash::RandomState;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Hands out one mutual-exclusion lock per cache key, so concurrent misses
/// for the same key collapse into a single load.
///
/// Locks are created lazily and reused for the life of the registry; they
/// are never removed, bounding the registry at the number of distinct keys
/// ever seen.
#[derive(Debug, Default)]
pub struct KeyLockRegistry {
    locks: DashMap<String, Arc<Mutex<()>>, RandomState>,
}

impl KeyLockRegistry {
    pub fn new() -> Self {
        Self {
            locks: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// The lock for the key, creating it on first use.
    pub fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.get(key) {
            return Arc::clone(lock.value());
        }
        self.locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of distinct keys ever locked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
