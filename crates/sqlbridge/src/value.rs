//! The opaque value model carried between callers and backends.
//!
//! Arguments flow in as [`Value`] (via `From` conversions) and results flow
//! back out through [`FromValue`], which fails with
//! [`AccessError::Conversion`] when a stored value cannot be coerced.

use crate::error::{AccessError, AccessResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single SQL argument or result cell, independent of any backend driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    /// Whether this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short type label used in conversion error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Uuid(_) => "uuid",
            Self::Json(_) => "json",
        }
    }

    fn conversion_to(&self, target: &str) -> AccessError {
        AccessError::conversion(format!("{self:?}"), target)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

/// Convert a stored [`Value`] into a concrete Rust type.
///
/// Conversions are deliberately forgiving where the reference backends are:
/// integers widen and narrow (checked), anything renders to text, and
/// ISO-8601 text parses to the temporal types (SQLite stores dates as text).
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> AccessResult<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> AccessResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            other => Err(other.conversion_to("bool")),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> AccessResult<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::Bool(b) => Ok(*b as i64),
            Value::Text(s) => s.parse().map_err(|_| value.conversion_to("i64")),
            other => Err(other.conversion_to("i64")),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> AccessResult<Self> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| value.conversion_to("i32"))
    }
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> AccessResult<Self> {
        let wide = i64::from_value(value)?;
        i16::try_from(wide).map_err(|_| value.conversion_to("i16"))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> AccessResult<Self> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::Text(s) => s.parse().map_err(|_| value.conversion_to("f64")),
            other => Err(other.conversion_to("f64")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> AccessResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Date(d) => Ok(d.to_string()),
            Value::DateTime(dt) => Ok(dt.to_string()),
            Value::Uuid(u) => Ok(u.to_string()),
            Value::Json(j) => Ok(j.to_string()),
            other => Err(other.conversion_to("String")),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> AccessResult<Self> {
        match value {
            Value::Date(d) => Ok(*d),
            Value::DateTime(dt) => Ok(dt.date()),
            Value::Text(s) => {
                // Accept a full timestamp and keep the date part.
                if let Ok(d) = s.parse::<NaiveDate>() {
                    return Ok(d);
                }
                NaiveDateTime::from_value(value).map(|dt| dt.date())
            }
            other => Err(other.conversion_to("NaiveDate")),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> AccessResult<Self> {
        match value {
            Value::DateTime(dt) => Ok(*dt),
            Value::Date(d) => Ok(d.and_time(chrono::NaiveTime::MIN)),
            Value::Text(s) => {
                if let Ok(dt) = s.parse::<NaiveDateTime>() {
                    return Ok(dt);
                }
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                    .or_else(|_| {
                        s.parse::<NaiveDate>()
                            .map(|d| d.and_time(chrono::NaiveTime::MIN))
                    })
                    .map_err(|_| value.conversion_to("NaiveDateTime"))
            }
            other => Err(other.conversion_to("NaiveDateTime")),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: &Value) -> AccessResult<Self> {
        match value {
            Value::Uuid(u) => Ok(*u),
            Value::Text(s) => s.parse().map_err(|_| value.conversion_to("Uuid")),
            other => Err(other.conversion_to("Uuid")),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> AccessResult<Self> {
        match value {
            Value::Json(j) => Ok(j.clone()),
            Value::Text(s) => {
                serde_json::from_str(s).map_err(|_| value.conversion_to("serde_json::Value"))
            }
            other => Err(other.conversion_to("serde_json::Value")),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> AccessResult<Self> {
        Ok(value.clone())
    }
}

// NULL maps to None; everything else converts through the inner type.
impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> AccessResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
