//! Dirty-tracking records.
//!
//! A [`Record`] is a two-layer view over one fetched row: the `original`
//! values snapshotted at load time and a sparse `modified` overlay that gains
//! an entry per assignment. Reads see the overlay first; writes never touch
//! the original layer, so "what changed" stays queryable until the record is
//! re-persisted.

use crate::error::{AccessError, AccessResult};
use crate::row::RowRead;
use crate::value::{FromValue, Value};
use std::collections::BTreeMap;

/// Populate an instance from a raw backend row.
///
/// Implemented by [`Record`]; implement it on your own wrapper types to use
/// [`Database::fetch_as`](crate::database::Database::fetch_as).
pub trait RecordLoad {
    /// Replace all prior state from `source`. A second call does not merge.
    fn load(&mut self, source: &dyn RowRead);
}

/// A dirty-tracking in-memory view of one fetched row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    field_names: Vec<String>,
    original: BTreeMap<usize, Value>,
    modified: BTreeMap<usize, Value>,
}

impl Record {
    /// Create an empty, unloaded record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Field names captured at load time; defines the ordinal order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// True while no column has been assigned since load (or construction).
    pub fn is_new(&self) -> bool {
        self.modified.is_empty()
    }

    /// True once any column has been assigned.
    pub fn is_modified(&self) -> bool {
        !self.modified.is_empty()
    }

    /// Resolve a column name to its ordinal (linear search).
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.field_names.iter().position(|n| n == name)
    }

    /// Read a column by name: the modified overlay if present, else the
    /// originally loaded value.
    pub fn get(&self, name: &str) -> AccessResult<&Value> {
        let ordinal = self
            .ordinal(name)
            .ok_or_else(|| AccessError::unknown_column(name))?;
        self.get_at(ordinal)
    }

    /// Read a column by ordinal.
    pub fn get_at(&self, ordinal: usize) -> AccessResult<&Value> {
        if ordinal >= self.field_names.len() {
            return Err(AccessError::lookup(format!(
                "ordinal {ordinal} out of range ({} fields)",
                self.field_names.len()
            )));
        }
        if let Some(value) = self.modified.get(&ordinal) {
            return Ok(value);
        }
        self.original
            .get(&ordinal)
            .ok_or_else(|| AccessError::lookup(format!("ordinal {ordinal} was never loaded")))
    }

    /// Assign a column by name. Always writes the modified overlay.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> AccessResult<()> {
        let ordinal = self
            .ordinal(name)
            .ok_or_else(|| AccessError::unknown_column(name))?;
        self.modified.insert(ordinal, value.into());
        Ok(())
    }

    /// Assign a column by ordinal.
    pub fn set_at(&mut self, ordinal: usize, value: impl Into<Value>) -> AccessResult<()> {
        if ordinal >= self.field_names.len() {
            return Err(AccessError::lookup(format!(
                "ordinal {ordinal} out of range ({} fields)",
                self.field_names.len()
            )));
        }
        self.modified.insert(ordinal, value.into());
        Ok(())
    }

    /// Read a column converted to `T`.
    ///
    /// Propagates both lookup and conversion failures.
    pub fn get_as<T: FromValue>(&self, name: &str) -> AccessResult<T> {
        T::from_value(self.get(name)?)
    }

    /// Read a column converted to `T`, or `default` when the column is
    /// absent or the value unconvertible.
    ///
    /// This is the one place a conversion failure is deliberately swallowed.
    pub fn get_or<T: FromValue>(&self, name: &str, default: T) -> T {
        self.get_as(name).unwrap_or(default)
    }

    /// The originally loaded value at `ordinal`, ignoring the overlay.
    pub fn original_at(&self, ordinal: usize) -> Option<&Value> {
        self.original.get(&ordinal)
    }

    /// The modified overlay entry at `ordinal`, if any.
    pub fn modified_at(&self, ordinal: usize) -> Option<&Value> {
        self.modified.get(&ordinal)
    }

    /// Export the modified overlay as a column→value mapping, in ordinal
    /// order, ready to feed [`Database::update`](crate::database::Database::update).
    pub fn changed_values(&self) -> Vec<(String, Value)> {
        self.modified
            .iter()
            .map(|(&ordinal, value)| (self.field_names[ordinal].clone(), value.clone()))
            .collect()
    }
}

impl RecordLoad for Record {
    fn load(&mut self, source: &dyn RowRead) {
        self.original.clear();
        self.modified.clear();
        self.field_names.clear();

        for ordinal in 0..source.field_count() {
            self.original.insert(ordinal, source.value_at(ordinal).clone());
            self.field_names.push(source.field_name(ordinal).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use std::sync::Arc;

    fn person() -> Record {
        let names: Arc<[String]> = vec![
            "Id".to_string(),
            "Name".to_string(),
            "Birthdate".to_string(),
        ]
        .into();
        let row = Row::new(
            names,
            vec![
                Value::Int(7),
                Value::Text("Ada".into()),
                Value::Text("1815-12-10".into()),
            ],
        );
        let mut record = Record::new();
        record.load(&row);
        record
    }

    #[test]
    fn reads_return_loaded_values_before_any_write() {
        let record = person();
        assert_eq!(record.get("Name").unwrap(), &Value::Text("Ada".into()));
        assert_eq!(record.get_at(0).unwrap(), &Value::Int(7));
        assert!(record.is_new());
        assert!(!record.is_modified());
    }

    #[test]
    fn write_overlays_without_touching_original() {
        let mut record = person();
        record.set("Name", "Augusta").unwrap();

        assert_eq!(record.get("Name").unwrap(), &Value::Text("Augusta".into()));
        assert_eq!(record.original_at(1), Some(&Value::Text("Ada".into())));
        assert_eq!(record.get("Id").unwrap(), &Value::Int(7));
        assert!(record.is_modified());
        assert!(!record.is_new());
    }

    #[test]
    fn modified_stays_true_after_first_write() {
        let mut record = person();
        record.set("Name", "Augusta").unwrap();
        record.set("Name", "Ada").unwrap();
        assert!(record.is_modified());
    }

    #[test]
    fn unknown_name_fails_fast() {
        let mut record = person();
        assert!(record.get("Missing").unwrap_err().is_lookup());
        assert!(record.set("Missing", 1i64).unwrap_err().is_lookup());
    }

    #[test]
    fn typed_accessors() {
        let record = person();
        assert_eq!(record.get_as::<i64>("Id").unwrap(), 7);
        assert_eq!(
            record.get_as::<chrono::NaiveDate>("Birthdate").unwrap(),
            chrono::NaiveDate::from_ymd_opt(1815, 12, 10).unwrap()
        );
        assert!(record.get_as::<i64>("Name").unwrap_err().is_conversion());
    }

    #[test]
    fn get_or_swallows_absence_and_bad_conversions() {
        let record = person();
        assert_eq!(record.get_or::<i64>("Missing", -1), -1);
        assert_eq!(record.get_or::<i64>("Name", -1), -1);
        assert_eq!(record.get_or::<i64>("Id", -1), 7);
    }

    #[test]
    fn second_load_replaces_everything() {
        let mut record = person();
        record.set("Name", "Augusta").unwrap();

        let names: Arc<[String]> = vec!["Other".to_string()].into();
        let row = Row::new(names, vec![Value::Bool(true)]);
        record.load(&row);

        assert_eq!(record.field_names(), ["Other"]);
        assert!(record.is_new());
        assert_eq!(record.get("Other").unwrap(), &Value::Bool(true));
        assert!(record.get("Name").unwrap_err().is_lookup());
    }

    #[test]
    fn changed_values_exports_only_the_overlay() {
        let mut record = person();
        record.set("Name", "Augusta").unwrap();
        record.set("Birthdate", "1815-12-11").unwrap();

        assert_eq!(
            record.changed_values(),
            vec![
                ("Name".to_string(), Value::Text("Augusta".into())),
                ("Birthdate".to_string(), Value::Text("1815-12-11".into())),
            ]
        );
    }

    #[test]
    fn unloaded_record_has_no_columns() {
        let record = Record::new();
        assert!(record.field_names().is_empty());
        assert!(record.get_at(0).unwrap_err().is_lookup());
    }
}
