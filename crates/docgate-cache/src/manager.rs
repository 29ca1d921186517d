//! Cache manager orchestration.

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::lock::KeyLockRegistry;
use crate::stats::CacheStats;
use crate::store::{now_millis, CacheEntry, CacheStore, CachedValue};
use docgate_core::{Document, SqlParam};
use docgate_executor::{ConnectionProvider, QueryExecutor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Build the cache key for a query: the raw SQL text followed by the
/// string form of every parameter in order. Null parameters render as the
/// literal text `null`.
///
/// Identical SQL and parameter values collide onto the same key by design;
/// incidental formatting differences in the SQL text produce distinct keys.
pub fn query_key(sql: &str, params: &[SqlParam]) -> String {
    let mut key = String::with_capacity(sql.len() + 16 * params.len());
    key.push_str(sql);
    for param in params {
        key.push_str(&param.to_string());
    }
    key
}

/// Serves query results from an expiring in-process cache, loading through
/// a [`QueryExecutor`] on miss.
///
/// Concurrent misses for the same key collapse into a single load; every
/// caller receives a structural copy of the cached result. Once the store
/// grows past `max_size` entries, a background pass evicts the
/// least-recently-hit entries down to `clear_size` without blocking
/// callers.
pub struct CacheManager {
    executor: QueryExecutor,
    store: Arc<CacheStore>,
    locks: KeyLockRegistry,
    stats: Arc<CacheStats>,
    config: CacheConfig,
    cleaning: Arc<AtomicBool>,
}

impl CacheManager {
    pub fn new(provider: Arc<dyn ConnectionProvider>, config: CacheConfig) -> Self {
        let executor = QueryExecutor::new(provider, config.default_data_source.clone());
        Self {
            executor,
            store: Arc::new(CacheStore::new()),
            locks: KeyLockRegistry::new(),
            stats: Arc::new(CacheStats::new()),
            config,
            cleaning: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Load a single-row result through the cache with the default expiry.
    pub async fn get_object(&self, sql: &str, params: &[SqlParam]) -> Result<Option<Document>> {
        self.get_object_with_expiry(sql, params, self.config.expiry)
            .await
    }

    /// Load a single-row result through the cache.
    ///
    /// Returns `None` when the query matched no row; the empty result is
    /// cached like any other.
    pub async fn get_object_with_expiry(
        &self,
        sql: &str,
        params: &[SqlParam],
        expiry: Duration,
    ) -> Result<Option<Document>> {
        let key = query_key(sql, params);

        if let Some(entry) = self.fresh_entry(&key, expiry) {
            let result = object_copy(&key, entry.value());
            self.evict_if_needed();
            return result;
        }

        let lock = self.locks.lock_for(&key);
        let guard = lock.lock().await;

        // Another caller may have refreshed the entry while we waited.
        let entry = match self.fresh_entry(&key, expiry) {
            Some(entry) => entry,
            None => {
                self.stats.record_miss();
                let loaded = self
                    .executor
                    .load_one(sql, params)
                    .await
                    .map_err(|source| CacheError::Load {
                        key: key.clone(),
                        source,
                    })?;
                self.stats.record_load();
                debug!("cached object result for [{}]", sql);
                let entry = Arc::new(CacheEntry::new(CachedValue::Object(loaded), now_millis()));
                self.store.put(key.clone(), Arc::clone(&entry));
                entry
            }
        };

        let result = object_copy(&key, entry.value());
        drop(guard);
        self.evict_if_needed();
        result
    }

    /// Load a multi-row result through the cache with the default expiry.
    pub async fn get_rows(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Document>> {
        self.get_rows_with_expiry(sql, params, self.config.expiry)
            .await
    }

    /// Load a multi-row result through the cache.
    pub async fn get_rows_with_expiry(
        &self,
        sql: &str,
        params: &[SqlParam],
        expiry: Duration,
    ) -> Result<Vec<Document>> {
        let key = query_key(sql, params);

        if let Some(entry) = self.fresh_entry(&key, expiry) {
            let result = rows_copy(&key, entry.value());
            self.evict_if_needed();
            return result;
        }

        let lock = self.locks.lock_for(&key);
        let guard = lock.lock().await;

        let entry = match self.fresh_entry(&key, expiry) {
            Some(entry) => entry,
            None => {
                self.stats.record_miss();
                let loaded = self
                    .executor
                    .load_many(sql, params)
                    .await
                    .map_err(|source| CacheError::Load {
                        key: key.clone(),
                        source,
                    })?;
                self.stats.record_load();
                debug!("cached {} row(s) for [{}]", loaded.len(), sql);
                let entry = Arc::new(CacheEntry::new(CachedValue::Rows(loaded), now_millis()));
                self.store.put(key.clone(), Arc::clone(&entry));
                entry
            }
        };

        let result = rows_copy(&key, entry.value());
        drop(guard);
        self.evict_if_needed();
        result
    }

    /// The underlying executor, for uncached loads and write statements.
    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    pub fn stats(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Current number of cached entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Return the entry for the key if it is still fresh, recording the
    /// hit and touching its last-hit timestamp.
    fn fresh_entry(&self, key: &str, expiry: Duration) -> Option<Arc<CacheEntry>> {
        let now = now_millis();
        let entry = self.store.get(key)?;
        if entry.is_stale(expiry, now) {
            return None;
        }
        entry.touch(now);
        self.stats.record_hit();
        Some(entry)
    }

    /// Kick off a background eviction pass when the store has outgrown
    /// `max_size`. At most one pass runs at a time; a trigger while one is
    /// in progress is a no-op.
    fn evict_if_needed(&self) {
        if self.store.len() <= self.config.max_size {
            return;
        }
        if self.cleaning.swap(true, Ordering::AcqRel) {
            return;
        }

        let store = Arc::clone(&self.store);
        let stats = Arc::clone(&self.stats);
        let cleaning = Arc::clone(&self.cleaning);
        let clear_size = self.config.clear_size;
        tokio::spawn(async move {
            let removed = run_eviction(&store, clear_size);
            stats.record_evictions(removed as u64);
            info!("cache eviction removed {} entries, {} kept", removed, store.len());
            cleaning.store(false, Ordering::Release);
        });
    }
}

/// Remove the least-recently-hit entries until the store is at
/// `clear_size` or the snapshot is exhausted. Works on a snapshot so the
/// live map is never locked for the whole sweep.
fn run_eviction(store: &CacheStore, clear_size: usize) -> usize {
    let mut snapshot = store.snapshot();
    snapshot.sort_by_key(|(_, last_hit)| *last_hit);

    let mut removed = 0;
    for (key, _) in snapshot {
        if store.len() <= clear_size {
            break;
        }
        if store.remove(&key) {
            removed += 1;
        }
    }
    removed
}

fn object_copy(key: &str, value: &CachedValue) -> Result<Option<Document>> {
    match value {
        CachedValue::Object(document) => Ok(document.clone()),
        CachedValue::Rows(_) => Err(CacheError::ResultShape {
            key: key.to_string(),
        }),
    }
}

fn rows_copy(key: &str, value: &CachedValue) -> Result<Vec<Document>> {
    match value {
        CachedValue::Rows(documents) => Ok(documents.clone()),
        CachedValue::Object(_) => Err(CacheError::ResultShape {
            key: key.to_string(),
        }),
    }
}
