//! Column-label to field-name translation.

use crate::metadata::ResultMetadata;
use ahash::RandomState;
use dashmap::DashMap;
use once_cell::sync::Lazy;

// Process-wide memo from column label to field name. The transform is pure
// and the label domain is bounded by the schema, so entries are never
// evicted.
static FIELD_NAMES: Lazy<DashMap<String, String, RandomState>> =
    Lazy::new(|| DashMap::with_hasher(RandomState::new()));

/// Translate an underscore-delimited column label to its field name.
///
/// The first segment is lower-cased; later segments of two characters or
/// fewer are kept as written (acronym preservation), longer segments are
/// title-cased: `ZIP_CODE` becomes `zipCode`, `CUSTOMER_ID` becomes
/// `customerID`.
pub fn column_to_field(column: &str) -> String {
    if let Some(field) = FIELD_NAMES.get(column) {
        return field.clone();
    }

    let field = derive_field(column);
    FIELD_NAMES.insert(column.to_string(), field.clone());
    field
}

/// Field names for every column of the result, in column order.
pub fn field_names(meta: &dyn ResultMetadata) -> Vec<String> {
    (0..meta.column_count())
        .map(|column| column_to_field(meta.column_label(column)))
        .collect()
}

fn derive_field(column: &str) -> String {
    let mut field = String::with_capacity(column.len());
    for (i, segment) in column.split('_').enumerate() {
        if i == 0 {
            field.push_str(&segment.to_lowercase());
        } else if segment.chars().count() <= 2 {
            field.push_str(segment);
        } else {
            let mut chars = segment.chars();
            if let Some(first) = chars.next() {
                field.extend(first.to_uppercase());
                field.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    field
}
