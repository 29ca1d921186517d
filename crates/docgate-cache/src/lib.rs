//! Expiring query result cache for docgate.
//!
//! [`CacheManager`] fronts a [`QueryExecutor`](docgate_executor::QueryExecutor)
//! with an in-process cache of marshalled documents keyed by SQL text and
//! parameter values.
//!
//! # Features
//!
//! - **Bounded staleness**: entries expire after a configurable duration,
//!   overridable per call
//! - **Single-flight loads**: concurrent misses for the same key collapse
//!   into one database load via per-key locks
//! - **Copy isolation**: callers receive a structural copy, never the
//!   shared cached instance
//! - **Drain-to-floor eviction**: a background pass removes the
//!   least-recently-hit entries once the store grows past `max_size`,
//!   down to `clear_size`, without blocking readers
//! - **Statistics**: hits, misses, loads and evictions on atomics

pub mod config;
pub mod error;
pub mod lock;
pub mod manager;
pub mod stats;
pub mod store;

pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use lock::KeyLockRegistry;
pub use manager::{query_key, CacheManager};
pub use stats::CacheStats;
pub use store::{CacheEntry, CacheStore, CachedValue};
