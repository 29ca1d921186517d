use docgate_core::BoxError;
use docgate_marshal::MarshalError;
use thiserror::Error;

/// Errors that can occur while executing a query.
#[derive(Error, Debug)]
pub enum ExecuteError {
    /// The connection provider could not hand out a connection.
    #[error("failed to acquire a connection from data source {source_name}: {source}")]
    ConnectionAcquisition {
        source_name: String,
        source: BoxError,
    },

    /// The statement failed; carries the failing SQL text.
    #[error("failed to execute query [{sql}]: {source}")]
    QueryExecution { sql: String, source: BoxError },

    /// The result set could not be marshalled into documents.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
}

/// Result type for executor operations.
pub type Result<T> = std::result::Result<T, ExecuteError>;
