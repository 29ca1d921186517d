use docgate_executor::ExecuteError;
use thiserror::Error;

/// Errors surfaced by the cache manager.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A database load on behalf of the cache failed; carries the cache
    /// key for context. The failed load stores nothing.
    #[error("failed to load cache entry for key [{key}]: {source}")]
    Load { key: String, source: ExecuteError },

    /// The cached result for the key holds the other result shape
    /// (object vs. rows).
    #[error("cached result for key [{key}] does not hold the requested shape")]
    ResultShape { key: String },
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
