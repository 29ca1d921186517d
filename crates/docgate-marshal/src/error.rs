use docgate_core::BoxError;
use thiserror::Error;

/// Errors that can occur while marshalling result rows.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// A column's reported type has no document representation.
    #[error("no column type mapping for {type_name} (column {column})")]
    UnmappedColumnType { column: String, type_name: String },

    /// A typed column read failed.
    #[error("failed to read column {column}: {source}")]
    ResultRead { column: String, source: BoxError },

    /// The cursor could not be advanced to the next row.
    #[error("failed to advance the result cursor: {source}")]
    CursorAdvance { source: BoxError },
}

/// Result type for marshalling operations.
pub type Result<T> = std::result::Result<T, MarshalError>;
