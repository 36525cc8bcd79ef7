//! Error types for sqlbridge

use thiserror::Error;

/// Result type alias for sqlbridge operations
pub type AccessResult<T> = Result<T, AccessError>;

/// Error types for data access operations
#[derive(Debug, Error)]
pub enum AccessError {
    /// Malformed or missing table/column name, caught before any backend call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend rejected the statement (syntax, constraint, connectivity)
    #[error("Execution error: {0}")]
    Execution(String),

    /// A value could not be coerced to the requested type
    #[error("Conversion error: cannot convert {value} to {target}")]
    Conversion { value: String, target: String },

    /// A named column or ordinal is absent from the current row
    #[error("Lookup error: {0}")]
    Lookup(String),
}

impl AccessError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a conversion error for a value and its requested target type
    pub fn conversion(value: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Conversion {
            value: value.into(),
            target: target.into(),
        }
    }

    /// Create a lookup error
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup(message.into())
    }

    /// Create a lookup error for an unknown column name
    pub fn unknown_column(name: &str) -> Self {
        Self::Lookup(format!("no column named '{name}'"))
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Check if this is a conversion error
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    /// Check if this is a lookup error
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }
}
