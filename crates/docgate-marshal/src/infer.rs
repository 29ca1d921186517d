//! Column-type inference from result metadata.

use crate::error::{MarshalError, Result};
use crate::metadata::ResultMetadata;

/// The semantic type a result column marshals to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Double,
    Integer,
    Long,
    Boolean,
    Date,
    Timestamp,
}

/// Infer the semantic type of every column.
///
/// Each column resolves to exactly one [`ColumnType`] or the whole
/// inference fails with [`MarshalError::UnmappedColumnType`] naming the
/// offending column.
pub fn infer_column_types(meta: &dyn ResultMetadata) -> Result<Vec<ColumnType>> {
    let mut types = Vec::with_capacity(meta.column_count());
    for column in 0..meta.column_count() {
        types.push(infer_column(meta, column)?);
    }
    Ok(types)
}

fn infer_column(meta: &dyn ResultMetadata, column: usize) -> Result<ColumnType> {
    let db_type = meta.db_type_name(column).map(|s| s.to_ascii_uppercase());
    let type_name = meta
        .value_type_name(column)
        .map(|s| s.to_ascii_uppercase())
        .or_else(|| db_type.clone());

    let type_name = match type_name {
        Some(name) => name,
        None => {
            return Err(MarshalError::UnmappedColumnType {
                column: meta.column_label(column).to_string(),
                type_name: "NOT_SET".to_string(),
            })
        }
    };

    // Whole-number columns on some vendors report as scale-less decimals.
    let scale_zero = meta.scale(column) == Some(0);

    let inferred = match type_name.as_str() {
        "DECIMAL" | "NUMERIC" | "NUMBER" => {
            if scale_zero {
                ColumnType::Long
            } else {
                ColumnType::Double
            }
        }
        "VARCHAR" | "NVARCHAR" | "CHAR" | "NCHAR" | "TEXT" => ColumnType::String,
        // Columns computed as a NULL literal report no concrete value type.
        "NULL" | "UNKNOWN" => ColumnType::String,
        "DOUBLE" | "FLOAT" | "REAL" => ColumnType::Double,
        "INTEGER" | "INT" | "SMALLINT" | "TINYINT" | "MEDIUMINT" => ColumnType::Integer,
        "BIGINT" => ColumnType::Long,
        "TIMESTAMP" | "DATETIME" => ColumnType::Timestamp,
        // TODO: dedicated handling for TIME columns instead of widening
        "TIME" => ColumnType::Timestamp,
        "DATE" => ColumnType::Date,
        "BOOLEAN" | "BOOL" | "BIT" => ColumnType::Boolean,
        _ if type_name.contains("BINARY_DOUBLE") => ColumnType::Double,
        _ if type_name.ends_with("CLOB") => ColumnType::String,
        _ if db_type.as_deref() == Some("BINARY") => ColumnType::String,
        _ => {
            return Err(MarshalError::UnmappedColumnType {
                column: meta.column_label(column).to_string(),
                type_name,
            })
        }
    };

    Ok(inferred)
}
