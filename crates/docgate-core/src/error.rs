use thiserror::Error;

/// Boxed error carried across the driver trait boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the typed field accessors on a document.
#[derive(Error, Debug)]
pub enum DocError {
    #[error("field {field} cannot be read as a number (found {found})")]
    NotANumber { field: String, found: &'static str },

    #[error("field {field} cannot be read as a boolean (found {found})")]
    NotABoolean { field: String, found: &'static str },

    #[error("only numeric fields can be read as a date (field {field} holds {found})")]
    NotADate { field: String, found: &'static str },

    #[error("field {field} holds {millis}, outside the representable date range")]
    DateOutOfRange { field: String, millis: i64 },
}

/// Result type for document accessor operations.
pub type Result<T> = std::result::Result<T, DocError>;
