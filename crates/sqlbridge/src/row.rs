//! Raw rows as yielded by a backend.
//!
//! [`RowRead`] is the minimal contract a backend row must satisfy for
//! [`Record::load`](crate::record::Record::load) to snapshot it: field count,
//! field name by ordinal, value by ordinal.

use crate::error::{AccessError, AccessResult};
use crate::value::{FromValue, Value};
use std::sync::Arc;

/// Read-only view over one result row.
///
/// Ordinals passed to `field_name`/`value_at` must be below `field_count`;
/// implementations may panic otherwise, exactly like slice indexing.
pub trait RowRead {
    fn field_count(&self) -> usize;
    fn field_name(&self, ordinal: usize) -> &str;
    fn value_at(&self, ordinal: usize) -> &Value;
}

/// A materialized row: shared column names plus owned values.
///
/// Field names are behind an `Arc` so every row of one result set shares a
/// single allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(names: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Resolve a column name to its ordinal (linear search).
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Typed access by column name.
    pub fn get<T: FromValue>(&self, name: &str) -> AccessResult<T> {
        let ordinal = self
            .ordinal(name)
            .ok_or_else(|| AccessError::unknown_column(name))?;
        T::from_value(&self.values[ordinal])
    }

    /// Typed access by ordinal.
    pub fn get_at<T: FromValue>(&self, ordinal: usize) -> AccessResult<T> {
        let value = self.values.get(ordinal).ok_or_else(|| {
            AccessError::lookup(format!(
                "ordinal {ordinal} out of range ({} fields)",
                self.values.len()
            ))
        })?;
        T::from_value(value)
    }
}

impl RowRead for Row {
    fn field_count(&self) -> usize {
        self.values.len()
    }

    fn field_name(&self, ordinal: usize) -> &str {
        &self.names[ordinal]
    }

    fn value_at(&self, ordinal: usize) -> &Value {
        &self.values[ordinal]
    }
}
