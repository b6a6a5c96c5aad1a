//! Structured operation descriptors
//!
//! This is the engine's public input: the SQL-text translation layer (not
//! part of this crate) turns a statement into one of these descriptors,
//! with identifiers validated and literals already detached from their
//! surrounding syntax. The engine never sees SQL text except the single
//! `<column> <op> <literal>` predicate string.

use crate::schema::{Column, Value};

/// Sort direction for an ORDER BY column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending (the default)
    #[default]
    Asc,
    /// Descending
    Desc,
}

/// ORDER BY specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Sort column name
    pub column: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl OrderBy {
    /// Ascending sort on a column
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on a column
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// One SET clause of an Update: column name plus the raw literal text,
/// parsed against the column's declared type at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Column to overwrite
    pub column: String,
    /// New value as a detached literal
    pub value: String,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// The tagged union of every operation the engine executes.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create a database namespace
    CreateDatabase {
        /// Database name
        name: String,
    },
    /// Validate that a database exists (context switch in the front end)
    SetDatabase {
        /// Database name
        name: String,
    },
    /// Create a table with an ordered column schema
    CreateTable {
        database: String,
        table: String,
        columns: Vec<Column>,
    },
    /// Delete an empty table's data file
    DropTable {
        database: String,
        table: String,
    },
    /// Append one row of typed values
    Insert {
        database: String,
        table: String,
        values: Vec<Value>,
    },
    /// Scan, filter, project, and optionally sort
    Select {
        database: String,
        table: String,
        /// Projection; empty or `["*"]` means all columns in schema order
        columns: Vec<String>,
        /// Single-comparison predicate text; `None` matches every row
        predicate: Option<String>,
        /// Optional sort specification
        order_by: Option<OrderBy>,
    },
    /// Overwrite listed columns on every matching row
    Update {
        database: String,
        table: String,
        assignments: Vec<Assignment>,
        predicate: Option<String>,
    },
    /// Remove every matching row
    Delete {
        database: String,
        table: String,
        predicate: Option<String>,
    },
    /// Record an index descriptor for a unique column
    CreateIndex {
        database: String,
        table: String,
        column: String,
        index_name: String,
        index_type: String,
    },
}

impl Operation {
    /// Short operation name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateDatabase { .. } => "CREATE_DATABASE",
            Operation::SetDatabase { .. } => "SET_DATABASE",
            Operation::CreateTable { .. } => "CREATE_TABLE",
            Operation::DropTable { .. } => "DROP_TABLE",
            Operation::Insert { .. } => "INSERT",
            Operation::Select { .. } => "SELECT",
            Operation::Update { .. } => "UPDATE",
            Operation::Delete { .. } => "DELETE",
            Operation::CreateIndex { .. } => "CREATE_INDEX",
        }
    }
}
