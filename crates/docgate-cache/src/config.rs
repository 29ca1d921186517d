//! Cache configuration options.

use std::time::Duration;

/// Configuration for the cache manager.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Data source used when no explicit name is given.
    pub default_data_source: String,
    /// Number of entries above which an eviction pass is triggered.
    pub max_size: usize,
    /// Target size after an eviction pass; must be below `max_size`.
    pub clear_size: usize,
    /// Default staleness duration, overridable per call.
    pub expiry: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_data_source: "default".to_string(),
            max_size: 1000,
            clear_size: 750,
            expiry: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Create a configuration with custom settings.
    pub fn new(
        default_data_source: impl Into<String>,
        max_size: usize,
        clear_size: usize,
        expiry: Duration,
    ) -> Self {
        Self {
            default_data_source: default_data_source.into(),
            max_size,
            clear_size,
            expiry,
        }
    }

    /// Set the default data source name.
    pub fn with_default_data_source(mut self, name: impl Into<String>) -> Self {
        self.default_data_source = name.into();
        self
    }

    /// Set the eviction trigger size.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the post-eviction floor size.
    pub fn with_clear_size(mut self, clear_size: usize) -> Self {
        self.clear_size = clear_size;
        self
    }

    /// Set the default expiry duration.
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.default_data_source, "default");
        assert_eq!(config.max_size, 1000);
        assert_eq!(config.clear_size, 750);
        assert_eq!(config.expiry, Duration::from_secs(60));
        assert!(config.clear_size < config.max_size);
    }

    #[test]
    fn test_builder_pattern() {
        let config = CacheConfig::default()
            .with_default_data_source("reporting")
            .with_max_size(200)
            .with_clear_size(150)
            .with_expiry(Duration::from_millis(500));

        assert_eq!(config.default_data_source, "reporting");
        assert_eq!(config.max_size, 200);
        assert_eq!(config.clear_size, 150);
        assert_eq!(config.expiry, Duration::from_millis(500));
    }
}
