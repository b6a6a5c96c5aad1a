//! Storage error types
//!
//! Every failure aborts the current operation and is reported to the
//! caller; nothing here is retried or silently swallowed. The two lenient
//! behaviors in the engine (VARCHAR truncation, unknown ORDER BY column)
//! are deliberately not errors and never reach this enum.

use thiserror::Error;

use crate::schema::CatalogError;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage and row-codec errors
#[derive(Debug, Error)]
pub enum StoreError {
    // Namespace errors
    #[error("database does not exist: {0}")]
    DatabaseNotFound(String),

    #[error("database already exists: {0}")]
    DatabaseAlreadyExists(String),

    // Table errors
    #[error("table does not exist: {0}")]
    TableNotFound(String),

    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("table is not empty: {0}")]
    TableNotEmpty(String),

    #[error("no columns defined for table")]
    NoColumnsDefined,

    // Codec errors
    #[error("row has {found} values but schema has {expected} columns")]
    RowArity { expected: usize, found: usize },

    #[error("type mismatch for column {column}: expected {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("corrupt record: {reason}")]
    CorruptRecord { reason: String },

    // Shared infrastructure
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Corrupt-record constructor for mid-row truncation.
    pub fn short_record(column: &str, needed: usize, available: usize) -> Self {
        StoreError::CorruptRecord {
            reason: format!(
                "column {} needs {} bytes but only {} remain",
                column, needed, available
            ),
        }
    }
}
