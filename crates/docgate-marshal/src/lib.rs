//! Typed row-to-document marshalling.
//!
//! Converts relational result rows into [`Document`](docgate_core::Document)
//! values using column metadata read exactly once per cursor:
//!
//! - **Type inference**: each column resolves to exactly one [`ColumnType`]
//!   or the conversion fails; there is no silent fallback.
//! - **Field naming**: underscore-delimited column labels are renamed to
//!   compact field names through a process-wide memoized table.
//! - **Null propagation**: a database NULL becomes a document null
//!   regardless of the column's inferred type.
//!
//! The driver side of the conversion is specified by the [`ResultMetadata`]
//! and [`ResultCursor`] traits; a concrete driver integration implements
//! them against its own result representation.

pub mod error;
pub mod infer;
pub mod metadata;
pub mod naming;
pub mod row;

pub use error::{MarshalError, Result};
pub use infer::{infer_column_types, ColumnType};
pub use metadata::{ResultCursor, ResultMetadata};
pub use naming::{column_to_field, field_names};
pub use row::{cursor_to_documents, row_to_document};
