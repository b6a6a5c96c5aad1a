//! flintdb - a minimal single-node flat-file record store
//!
//! A table is a directory entry plus one binary file of back-to-back
//! fixed-width records; schemas live in a shared append-only catalog, and
//! queries run as sequential scans (filter, project, sort, update,
//! delete). There is no WAL, no transactions, and no query planner.
//!
//! The SQL-text front end is not part of this crate: callers hand the
//! [`executor::QueryExecutor`] a structured [`executor::Operation`]
//! descriptor and get an [`executor::OperationResult`] back.

pub mod config;
pub mod executor;
pub mod index;
pub mod observability;
pub mod schema;
pub mod storage;
