//! Executor error types
//!
//! Everything here is recoverable at the caller level: a failure aborts
//! the current operation and becomes an Error-status result, never a
//! process crash.

use thiserror::Error;

use crate::storage::StoreError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Query execution errors
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("column does not exist: {0}")]
    ColumnNotFound(String),

    #[error("schema mismatch: table has {expected} columns but {found} values were given")]
    SchemaMismatch { expected: usize, found: usize },

    #[error("duplicate ID value '{0}' is not allowed")]
    DuplicateKey(String),

    // Predicate errors
    #[error("invalid WHERE condition: {0}")]
    InvalidPredicate(String),

    #[error("operator {op} is not supported for value '{value}'")]
    UnsupportedComparison { op: String, value: String },

    // Index errors
    #[error("an index already exists on column {column}")]
    IndexAlreadyExists { column: String },

    #[error("column {column} contains duplicate values; cannot create index")]
    DuplicateValues { column: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
