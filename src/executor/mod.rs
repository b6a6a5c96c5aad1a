//! Query execution subsystem
//!
//! Composes the table store, predicate evaluator, and sorter to implement
//! the full operation set: CreateDatabase, SetDatabase, CreateTable,
//! DropTable, Insert, Select, Update, Delete, CreateIndex.
//!
//! # Execution shape
//!
//! 1. Resolve the table schema through the catalog
//! 2. Perform file-level work through the table store
//! 3. Filter with the single-comparison predicate evaluator
//! 4. Sort (Select only), stable and typed off the schema
//! 5. Return an [`OperationResult`]; failures are Error results, not panics

mod errors;
mod executor;
mod filters;
mod operation;
mod result;
mod sorter;

pub use errors::{ExecutorError, ExecutorResult};
pub use executor::QueryExecutor;
pub use filters::{CompareOp, Predicate};
pub use operation::{Assignment, Operation, OrderBy, SortDirection};
pub use result::{OperationResult, OperationStatus};
pub use sorter::sort_rows;
