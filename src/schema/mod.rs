//! Schema subsystem: column types, typed values, and the system catalog
//!
//! The catalog is an append-only file mapping (database, table) to an
//! ordered column list. Lookup is a forward scan where the first matching
//! entry is authoritative; stale entries from redefinitions or drops are
//! never reconciled.

mod catalog;
mod errors;
mod types;

pub(crate) use catalog::FrameCursor;

pub use catalog::Catalog;
pub use errors::{CatalogError, CatalogResult};
pub use types::{column_position, row_width, Column, ColumnType, Value, DATETIME_FORMAT};
