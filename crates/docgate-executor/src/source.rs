//! Driver seam traits.
//!
//! A concrete driver integration implements these against its pool and wire
//! protocol. The executor never retries a failed acquisition and relies on
//! `Drop` for releasing connections, statements and cursors.

use async_trait::async_trait;
use docgate_core::{BoxError, SqlParam};
use docgate_marshal::ResultCursor;

/// Hands out pooled connections by logical data-source name.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn connection(&self, source: &str) -> std::result::Result<Box<dyn Connection>, BoxError>;
}

/// A live database connection.
pub trait Connection: Send + Sync {
    fn prepare(&self, sql: &str) -> std::result::Result<Box<dyn Statement>, BoxError>;
}

/// A prepared statement.
///
/// Parameters are bound positionally in call order. [`SqlParam::Date`]
/// binds as a date-only value; [`SqlParam::Timestamp`] binds with full
/// time-of-day precision.
#[async_trait]
pub trait Statement: Send {
    /// Run the query and return a cursor over its results.
    async fn query(
        &mut self,
        params: &[SqlParam],
    ) -> std::result::Result<Box<dyn ResultCursor>, BoxError>;

    /// Run a statement with no result set; returns the affected row count.
    async fn execute(&mut self, params: &[SqlParam]) -> std::result::Result<u64, BoxError>;
}
