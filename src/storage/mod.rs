//! Flat-file storage subsystem
//!
//! Owns the on-disk layout: one directory per database, one fixed-width
//! binary data file per table, plus the system catalogs. All access is
//! synchronous and handle-per-operation; the store holds no long-lived
//! file handles and provides no locking.
//!
//! Mutations (Update/Delete) are full-file rewrites: read every row, let
//! the caller keep/replace/drop each one, and truncate-and-write-back only
//! when something actually changed. O(table size) per mutation is the
//! accepted scalability ceiling of this design.

mod errors;
mod row;
mod store;

pub use errors::{StoreError, StoreResult};
pub use row::{decode_row, encode_row, validate_row};
pub use store::{RewriteDecision, RowScan, TableStore};
