//! Catalog error types
//!
//! Catalog failures are the one unrecoverable class in the engine: every
//! data operation resolves its schema through the catalog, so an I/O
//! failure here aborts the operation with no fallback.

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog entry frame ended mid-field
    #[error("corrupt catalog entry at offset {offset}: {reason}")]
    CorruptEntry {
        /// Byte offset of the frame that failed to parse
        offset: u64,
        /// What was being read when the bytes ran out
        reason: String,
    },

    /// Underlying filesystem failure
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),
}
