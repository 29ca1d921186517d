//! Row and cursor conversion.

use crate::error::{MarshalError, Result};
use crate::infer::{infer_column_types, ColumnType};
use crate::metadata::ResultCursor;
use crate::naming::field_names;
use chrono::NaiveTime;
use docgate_core::{BoxError, Document, Value};

/// Convert the cursor's current row into a document.
///
/// `types` and `names` are the per-query inference results; reusing them
/// across rows keeps metadata reads to one per cursor.
pub fn row_to_document(
    cursor: &dyn ResultCursor,
    types: &[ColumnType],
    names: &[String],
) -> Result<Document> {
    let mut document = Document::with_capacity(names.len());
    for (column, (column_type, name)) in types.iter().zip(names).enumerate() {
        let value = read_value(cursor, column, *column_type).map_err(|source| {
            MarshalError::ResultRead {
                column: name.clone(),
                source,
            }
        })?;
        document.insert(name.clone(), value);
    }
    Ok(document)
}

/// Convert every remaining row of the cursor into documents.
///
/// Metadata is read once up front; the cursor is consumed and not
/// restartable.
pub fn cursor_to_documents(cursor: &mut dyn ResultCursor) -> Result<Vec<Document>> {
    let (types, names) = {
        let meta = cursor.metadata();
        (infer_column_types(meta)?, field_names(meta))
    };

    let mut documents = Vec::new();
    while cursor
        .advance()
        .map_err(|source| MarshalError::CursorAdvance { source })?
    {
        documents.push(row_to_document(&*cursor, &types, &names)?);
    }
    Ok(documents)
}

fn read_value(
    cursor: &dyn ResultCursor,
    column: usize,
    column_type: ColumnType,
) -> std::result::Result<Value, BoxError> {
    let value = match column_type {
        ColumnType::String => cursor.get_string(column)?.into(),
        ColumnType::Double => cursor.get_f64(column)?.into(),
        ColumnType::Integer => cursor.get_i32(column)?.into(),
        ColumnType::Long => cursor.get_i64(column)?.into(),
        ColumnType::Boolean => cursor.get_bool(column)?.into(),
        ColumnType::Date => cursor
            .get_date(column)?
            .map(|date| date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
            .into(),
        ColumnType::Timestamp => cursor
            .get_timestamp(column)?
            .map(|at| at.timestamp_millis())
            .into(),
    };
    Ok(value)
}
