//! Driver-side result traits.
//!
//! These traits are the seam between the marshaller and a concrete database
//! driver. The driver owns connections and wire formats; the marshaller only
//! needs column metadata and typed reads against the current row.

use chrono::{DateTime, NaiveDate, Utc};
use docgate_core::BoxError;

/// Column metadata for one executed query.
///
/// The marshaller reads metadata exactly once per cursor, before the first
/// row is converted.
pub trait ResultMetadata {
    fn column_count(&self) -> usize;

    /// The driver's value-type name for the column (e.g. `VARCHAR`,
    /// `DECIMAL`), when it reports one.
    fn value_type_name(&self, column: usize) -> Option<&str>;

    /// The vendor type name, used as a fallback when no value type is
    /// reported and for the fixed-width binary check.
    fn db_type_name(&self, column: usize) -> Option<&str>;

    /// Decimal scale, when the column has one.
    fn scale(&self, column: usize) -> Option<i32>;

    /// The column label the field name is derived from.
    fn column_label(&self, column: usize) -> &str;
}

/// A forward-only cursor over query results.
///
/// `advance` moves to the next row and reports whether one exists. The
/// typed reads target the current row; a database NULL reads as `None`.
/// Columns are addressed by zero-based position.
pub trait ResultCursor: Send {
    fn metadata(&self) -> &dyn ResultMetadata;

    fn advance(&mut self) -> std::result::Result<bool, BoxError>;

    fn get_string(&self, column: usize) -> std::result::Result<Option<String>, BoxError>;
    fn get_f64(&self, column: usize) -> std::result::Result<Option<f64>, BoxError>;
    fn get_i32(&self, column: usize) -> std::result::Result<Option<i32>, BoxError>;
    fn get_i64(&self, column: usize) -> std::result::Result<Option<i64>, BoxError>;
    fn get_bool(&self, column: usize) -> std::result::Result<Option<bool>, BoxError>;
    fn get_date(&self, column: usize) -> std::result::Result<Option<NaiveDate>, BoxError>;
    fn get_timestamp(&self, column: usize)
        -> std::result::Result<Option<DateTime<Utc>>, BoxError>;
}
