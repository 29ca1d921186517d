//! Core types for docgate.
//!
//! A [`Document`] is the JSON-shaped representation of one database row:
//! an ordered mapping from field name to a scalar [`Value`]. Documents are
//! produced by the marshalling layer and handed to the request-handling
//! layer, which reads fields through the typed accessors on [`Document`].
//!
//! [`SqlParam`] is the positional query parameter type consumed by the
//! executor layer.

pub mod document;
pub mod error;
pub mod param;
pub mod value;

pub use document::Document;
pub use error::{BoxError, DocError, Result};
pub use param::SqlParam;
pub use value::Value;
