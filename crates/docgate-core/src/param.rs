use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// A positional SQL query parameter.
///
/// Temporal parameters come in two flavors: [`SqlParam::Date`] binds as a
/// calendar date without a time component, [`SqlParam::Timestamp`] binds
/// with full time-of-day precision. Callers choose by constructing from
/// `NaiveDate` or `DateTime<Utc>` respectively.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

/// The string form is used to build cache keys: `Null` renders as the
/// literal text `null`, everything else as its natural display form.
impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Null => f.write_str("null"),
            SqlParam::Bool(v) => write!(f, "{v}"),
            SqlParam::Int(v) => write!(f, "{v}"),
            SqlParam::Float(v) => write!(f, "{v}"),
            SqlParam::Text(v) => f.write_str(v),
            SqlParam::Date(v) => write!(f, "{v}"),
            SqlParam::Timestamp(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(i64::from(v))
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        SqlParam::Float(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(v: NaiveDate) -> Self {
        SqlParam::Date(v)
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(v: DateTime<Utc>) -> Self {
        SqlParam::Timestamp(v)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => SqlParam::Null,
        }
    }
}
