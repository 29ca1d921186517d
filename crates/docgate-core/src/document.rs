use crate::error::{DocError, Result};
use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered mapping from field name to scalar value, representing one
/// marshalled database row.
///
/// Field order follows insertion order, so a marshalled document lists its
/// fields in column order. `Clone` produces the structural copy handed out
/// by the cache layer; the clone can be freely mutated without affecting
/// the original.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<(String, Value)>,
}

impl Document {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Set a field, replacing an existing field of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Read a field as a string.
    ///
    /// Non-string scalars are stringified; null or absent fields read as
    /// `None`.
    pub fn get_str(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::Null => None,
            Value::Bool(v) => Some(v.to_string()),
            Value::Int(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::Str(v) => Some(v.clone()),
        }
    }

    /// Read a numeric field as a double.
    pub fn get_f64(&self, name: &str) -> Result<Option<f64>> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Int(v)) => Ok(Some(*v as f64)),
            Some(Value::Float(v)) => Ok(Some(*v)),
            Some(other) => Err(DocError::NotANumber {
                field: name.to_string(),
                found: other.kind(),
            }),
        }
    }

    /// Read a numeric field as an integer; doubles are truncated.
    pub fn get_i64(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Int(v)) => Ok(Some(*v)),
            Some(Value::Float(v)) => Ok(Some(*v as i64)),
            Some(other) => Err(DocError::NotANumber {
                field: name.to_string(),
                found: other.kind(),
            }),
        }
    }

    /// Read a boolean field.
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(v)) => Ok(Some(*v)),
            Some(other) => Err(DocError::NotABoolean {
                field: name.to_string(),
                found: other.kind(),
            }),
        }
    }

    /// Read a numeric field holding epoch milliseconds as a timestamp.
    pub fn get_date(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let millis = match self.get(name) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Int(v)) => *v,
            Some(Value::Float(v)) => *v as i64,
            Some(other) => {
                return Err(DocError::NotADate {
                    field: name.to_string(),
                    found: other.kind(),
                })
            }
        };
        DateTime::from_timestamp_millis(millis)
            .map(Some)
            .ok_or(DocError::DateOutOfRange {
                field: name.to_string(),
                millis,
            })
    }

    /// Truthiness of a field: absent or null is false, booleans pass
    /// through, zero and the empty string are false, everything else is
    /// true.
    pub fn is_truthy(&self, name: &str) -> bool {
        match self.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(v)) => *v,
            Some(Value::Int(v)) => *v != 0,
            Some(Value::Float(v)) => *v != 0.0,
            Some(Value::Str(v)) => !v.is_empty(),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.insert("name", "Ada");
        doc.insert("age", 36i64);
        doc.insert("score", 0.5f64);
        doc.insert("active", true);
        doc.insert("note", Value::Null);
        doc
    }

    #[test]
    fn test_insert_preserves_order() {
        let doc = sample();
        let names: Vec<&str> = doc.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "age", "score", "active", "note"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut doc = sample();
        doc.insert("age", 37i64);
        assert_eq!(doc.len(), 5);
        assert_eq!(doc.get("age"), Some(&Value::Int(37)));
        let names: Vec<&str> = doc.iter().map(|(n, _)| n).collect();
        assert_eq!(names[1], "age");
    }

    #[test]
    fn test_remove() {
        let mut doc = sample();
        assert_eq!(doc.remove("age"), Some(Value::Int(36)));
        assert_eq!(doc.remove("age"), None);
        assert!(!doc.contains("age"));
    }

    #[test]
    fn test_get_str_stringifies() {
        let doc = sample();
        assert_eq!(doc.get_str("name").as_deref(), Some("Ada"));
        assert_eq!(doc.get_str("age").as_deref(), Some("36"));
        assert_eq!(doc.get_str("active").as_deref(), Some("true"));
        assert_eq!(doc.get_str("note"), None);
        assert_eq!(doc.get_str("missing"), None);
    }

    #[test]
    fn test_get_f64_coercion() {
        let doc = sample();
        assert_eq!(doc.get_f64("age").unwrap(), Some(36.0));
        assert_eq!(doc.get_f64("score").unwrap(), Some(0.5));
        assert_eq!(doc.get_f64("note").unwrap(), None);
        assert!(doc.get_f64("name").is_err());
    }

    #[test]
    fn test_get_i64_truncates_doubles() {
        let doc = sample();
        assert_eq!(doc.get_i64("score").unwrap(), Some(0));
        assert_eq!(doc.get_i64("age").unwrap(), Some(36));
        assert!(doc.get_i64("active").is_err());
    }

    #[test]
    fn test_get_bool_is_strict() {
        let doc = sample();
        assert_eq!(doc.get_bool("active").unwrap(), Some(true));
        assert_eq!(doc.get_bool("note").unwrap(), None);
        assert_eq!(doc.get_bool("missing").unwrap(), None);
        assert!(doc.get_bool("age").is_err());
    }

    #[test]
    fn test_get_date_from_millis() {
        let mut doc = Document::new();
        doc.insert("created", 1_000i64);
        let date = doc.get_date("created").unwrap().unwrap();
        assert_eq!(date.timestamp_millis(), 1_000);

        doc.insert("label", "tomorrow");
        assert!(doc.get_date("label").is_err());
        assert_eq!(doc.get_date("missing").unwrap(), None);
    }

    #[test]
    fn test_truthiness_table() {
        let mut doc = Document::new();
        doc.insert("t", true);
        doc.insert("f", false);
        doc.insert("zero", 0i64);
        doc.insert("one", 1i64);
        doc.insert("zero_f", 0.0f64);
        doc.insert("neg", -2.5f64);
        doc.insert("empty", "");
        doc.insert("word", "no");
        doc.insert("null", Value::Null);

        assert!(doc.is_truthy("t"));
        assert!(!doc.is_truthy("f"));
        assert!(!doc.is_truthy("zero"));
        assert!(doc.is_truthy("one"));
        assert!(!doc.is_truthy("zero_f"));
        assert!(doc.is_truthy("neg"));
        assert!(!doc.is_truthy("empty"));
        assert!(doc.is_truthy("word"));
        assert!(!doc.is_truthy("null"));
        assert!(!doc.is_truthy("absent"));
    }

    #[test]
    fn test_serializes_as_json_object() {
        let mut doc = Document::new();
        doc.insert("id", 7i64);
        doc.insert("name", "Ada");
        doc.insert("note", Value::Null);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"id":7,"name":"Ada","note":null}"#);
    }

    #[test]
    fn test_clone_is_structural_copy() {
        let original = sample();
        let mut copy = original.clone();
        copy.insert("name", "Grace");
        copy.insert("extra", 1i64);
        assert_eq!(original.get_str("name").as_deref(), Some("Ada"));
        assert!(!original.contains("extra"));
    }
}
