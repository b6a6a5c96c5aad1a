//! Query executor
//!
//! Receives structured operation descriptors, resolves schemas through the
//! catalog, performs file-level work through the table store, and filters
//! and sorts through the predicate evaluator. Every operation runs to
//! completion or fails; there is no retry and no partial result.

use std::collections::HashSet;

use crate::index::{IndexBackend, IndexDescriptor, NoopIndex};
use crate::observability::Logger;
use crate::schema::{column_position, Column, ColumnType, Value};
use crate::storage::{encode_row, validate_row, RewriteDecision, StoreError, TableStore};

use super::errors::{ExecutorError, ExecutorResult};
use super::filters::Predicate;
use super::operation::{Assignment, Operation, OrderBy};
use super::result::OperationResult;
use super::sorter::sort_rows;

/// Executes operations against one table store.
///
/// The store is borrowed: the caller constructs it once at startup and
/// owns its lifecycle. The index backend is a stub substitution point; the
/// default records nothing.
pub struct QueryExecutor<'a> {
    store: &'a TableStore,
    backend: Box<dyn IndexBackend>,
}

impl<'a> QueryExecutor<'a> {
    /// Creates an executor with the no-op index backend.
    pub fn new(store: &'a TableStore) -> Self {
        Self {
            store,
            backend: Box::new(NoopIndex),
        }
    }

    /// Creates an executor with a caller-supplied index backend.
    pub fn with_backend(store: &'a TableStore, backend: Box<dyn IndexBackend>) -> Self {
        Self { store, backend }
    }

    /// Executes one operation descriptor.
    ///
    /// Failures never escape as panics or process exits; they become an
    /// Error-status result carrying the failure message.
    pub fn execute(&mut self, operation: &Operation) -> OperationResult {
        let outcome = match operation {
            Operation::CreateDatabase { name } => self.create_database(name),
            Operation::SetDatabase { name } => self.set_database(name),
            Operation::CreateTable {
                database,
                table,
                columns,
            } => self.create_table(database, table, columns),
            Operation::DropTable { database, table } => self.drop_table(database, table),
            Operation::Insert {
                database,
                table,
                values,
            } => self.insert(database, table, values),
            Operation::Select {
                database,
                table,
                columns,
                predicate,
                order_by,
            } => self.select(database, table, columns, predicate.as_deref(), order_by),
            Operation::Update {
                database,
                table,
                assignments,
                predicate,
            } => self.update(database, table, assignments, predicate.as_deref()),
            Operation::Delete {
                database,
                table,
                predicate,
            } => self.delete(database, table, predicate.as_deref()),
            Operation::CreateIndex {
                database,
                table,
                column,
                index_name,
                index_type,
            } => self.create_index(database, table, column, index_name, index_type),
        };

        match outcome {
            Ok(result) => result,
            Err(e) => {
                Logger::error(
                    "OPERATION_FAILED",
                    &[("operation", operation.name()), ("error", &e.to_string())],
                );
                OperationResult::error(e.to_string())
            }
        }
    }

    fn schema(&self, database: &str, table: &str) -> ExecutorResult<Vec<Column>> {
        Ok(self.store.table_schema(database, table)?)
    }

    fn create_database(&self, name: &str) -> ExecutorResult<OperationResult> {
        self.store.create_database(name)?;
        Ok(OperationResult::success("Database created successfully."))
    }

    fn set_database(&self, name: &str) -> ExecutorResult<OperationResult> {
        self.store.set_database(name)?;
        Ok(OperationResult::success("Database exists."))
    }

    fn create_table(
        &self,
        database: &str,
        table: &str,
        columns: &[Column],
    ) -> ExecutorResult<OperationResult> {
        self.store.create_table(database, table, columns)?;
        Ok(OperationResult::success("Table created successfully."))
    }

    fn drop_table(&self, database: &str, table: &str) -> ExecutorResult<OperationResult> {
        self.store.drop_table(database, table)?;
        Ok(OperationResult::success("Table dropped successfully."))
    }

    fn insert(
        &mut self,
        database: &str,
        table: &str,
        values: &[Value],
    ) -> ExecutorResult<OperationResult> {
        let columns = self.schema(database, table)?;

        if columns.len() != values.len() {
            return Err(ExecutorError::SchemaMismatch {
                expected: columns.len(),
                found: values.len(),
            });
        }
        validate_row(&columns, values).map_err(ExecutorError::Store)?;

        // A column literally named ID (any casing) acts as a unique key.
        if let Some(id_position) = column_position(&columns, "ID") {
            let key = values[id_position].to_string();
            for item in self.store.scan(database, table)? {
                let (_, row) = item?;
                if row[id_position].to_string() == key {
                    return Err(ExecutorError::DuplicateKey(key));
                }
            }
        }

        let encoded = encode_row(&columns, values).map_err(ExecutorError::Store)?;
        let offset = self.store.append_row(database, table, &encoded)?;

        self.maintain_indexes(database, table, &columns, values, offset)?;

        Logger::info(
            "ROW_INSERTED",
            &[
                ("database", database),
                ("table", table),
                ("offset", &offset.to_string()),
            ],
        );
        Ok(OperationResult::success("Row inserted successfully."))
    }

    /// Appends index entries for every indexed column of the new row.
    ///
    /// Best-effort: the row is already durable, so an entry-file failure
    /// is logged and skipped rather than failing the Insert.
    fn maintain_indexes(
        &mut self,
        database: &str,
        table: &str,
        columns: &[Column],
        values: &[Value],
        offset: u64,
    ) -> ExecutorResult<()> {
        for descriptor in self.store.indexes().for_table(database, table)? {
            let Some(position) = column_position(columns, &descriptor.column) else {
                continue;
            };
            let key = values[position].to_string();
            self.backend.insert(&key, offset);
            if let Err(e) = self.store.indexes().append_entry(
                database,
                table,
                &descriptor.column,
                &key,
                offset,
            ) {
                Logger::warn(
                    "INDEX_ENTRY_SKIPPED",
                    &[
                        ("index", &descriptor.index_name),
                        ("column", &descriptor.column),
                        ("error", &e.to_string()),
                    ],
                );
            }
        }
        Ok(())
    }

    fn select(
        &self,
        database: &str,
        table: &str,
        projection: &[String],
        condition: Option<&str>,
        order_by: &Option<OrderBy>,
    ) -> ExecutorResult<OperationResult> {
        let columns = self.schema(database, table)?;
        let predicate = Predicate::parse(condition)?;

        let mut rows: Vec<Vec<Value>> = Vec::new();
        for item in self.store.scan(database, table)? {
            let (_, values) = item?;
            let keep = match &predicate {
                Some(p) => p.matches(&columns, &values)?,
                None => true,
            };
            if keep {
                rows.push(values);
            }
        }

        // Sort before projecting, keyed off the schema type of the sort
        // column; an unknown column degrades to an unsorted Warning.
        let mut sort_warning = None;
        if let Some(spec) = order_by {
            match column_position(&columns, &spec.column) {
                Some(key) => {
                    sort_rows(&mut rows, key, &columns[key].column_type, spec.direction);
                }
                None => {
                    Logger::warn(
                        "ORDER_BY_COLUMN_UNKNOWN",
                        &[("table", table), ("column", &spec.column)],
                    );
                    sort_warning = Some(format!(
                        "Unknown ORDER BY column '{}'; results are unsorted.",
                        spec.column
                    ));
                }
            }
        }

        let selected = resolve_projection(&columns, projection)?;
        let text = rows
            .iter()
            .map(|row| {
                selected
                    .iter()
                    .map(|&i| row[i].to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let message = format!("{} row(s) selected.", rows.len());
        Ok(match sort_warning {
            Some(warning) => OperationResult::warning_with_rows(warning, text),
            None => OperationResult::success_with_rows(message, text),
        })
    }

    fn update(
        &self,
        database: &str,
        table: &str,
        assignments: &[Assignment],
        condition: Option<&str>,
    ) -> ExecutorResult<OperationResult> {
        let columns = self.schema(database, table)?;
        let predicate = Predicate::parse(condition)?;

        // Resolve and type-check every SET clause before touching the file.
        let mut planned: Vec<(usize, Value)> = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let position = column_position(&columns, &assignment.column)
                .ok_or_else(|| ExecutorError::ColumnNotFound(assignment.column.clone()))?;
            let value = parse_literal(&columns[position], &assignment.value)?;
            planned.push((position, value));
        }

        let changed = self
            .store
            .rewrite(database, table, |_, values| -> ExecutorResult<RewriteDecision> {
                let hit = match &predicate {
                    Some(p) => p.matches(&columns, values)?,
                    None => true,
                };
                if !hit {
                    return Ok(RewriteDecision::Keep);
                }
                let mut next = values.to_vec();
                for (position, value) in &planned {
                    next[*position] = value.clone();
                }
                Ok(RewriteDecision::Replace(next))
            })?;

        if changed {
            Logger::info("ROWS_UPDATED", &[("database", database), ("table", table)]);
            Ok(OperationResult::success("Rows updated successfully."))
        } else {
            Ok(OperationResult::success("No rows matched the condition."))
        }
    }

    fn delete(
        &self,
        database: &str,
        table: &str,
        condition: Option<&str>,
    ) -> ExecutorResult<OperationResult> {
        let columns = self.schema(database, table)?;
        let predicate = Predicate::parse(condition)?;

        let changed = self
            .store
            .rewrite(database, table, |_, values| -> ExecutorResult<RewriteDecision> {
                let hit = match &predicate {
                    Some(p) => p.matches(&columns, values)?,
                    None => true,
                };
                Ok(if hit {
                    RewriteDecision::Remove
                } else {
                    RewriteDecision::Keep
                })
            })?;

        if changed {
            Logger::info("ROWS_DELETED", &[("database", database), ("table", table)]);
            Ok(OperationResult::success("Rows deleted successfully."))
        } else {
            Ok(OperationResult::success("No rows matched the condition."))
        }
    }

    fn create_index(
        &self,
        database: &str,
        table: &str,
        column: &str,
        index_name: &str,
        index_type: &str,
    ) -> ExecutorResult<OperationResult> {
        let columns = self.schema(database, table)?;
        let position = column_position(&columns, column)
            .ok_or_else(|| ExecutorError::ColumnNotFound(column.to_string()))?;

        if self.store.indexes().exists(database, table, column)? {
            return Err(ExecutorError::IndexAlreadyExists {
                column: column.to_string(),
            });
        }

        // Indexes are unique: reject creation over existing duplicates.
        let mut seen = HashSet::new();
        for item in self.store.scan(database, table)? {
            let (_, values) = item?;
            if !seen.insert(values[position].to_string()) {
                return Err(ExecutorError::DuplicateValues {
                    column: column.to_string(),
                });
            }
        }

        self.store.indexes().record(&IndexDescriptor::new(
            database, table, column, index_name, index_type,
        ))?;
        Logger::info(
            "INDEX_CREATED",
            &[
                ("table", table),
                ("column", column),
                ("index", index_name),
                ("type", index_type),
            ],
        );
        Ok(OperationResult::success("Index created successfully."))
    }
}

/// Maps a projection list to column positions.
///
/// An empty list or a single `*` selects every column in schema order.
fn resolve_projection(columns: &[Column], projection: &[String]) -> ExecutorResult<Vec<usize>> {
    if projection.is_empty() || (projection.len() == 1 && projection[0] == "*") {
        return Ok((0..columns.len()).collect());
    }
    projection
        .iter()
        .map(|name| {
            column_position(columns, name).ok_or_else(|| ExecutorError::ColumnNotFound(name.clone()))
        })
        .collect()
}

/// Parses a detached literal against a column's declared type.
fn parse_literal(column: &Column, literal: &str) -> ExecutorResult<Value> {
    match column.column_type {
        ColumnType::Integer => literal.trim().parse::<i32>().map(Value::Integer).map_err(|_| {
            ExecutorError::Store(StoreError::TypeMismatch {
                column: column.name.clone(),
                expected: "INTEGER",
                found: format!("literal {:?}", literal),
            })
        }),
        ColumnType::Varchar { .. } => Ok(Value::Text(literal.to_string())),
        ColumnType::Datetime => Value::parse_timestamp(literal)
            .map(Value::Timestamp)
            .ok_or_else(|| {
                ExecutorError::Store(StoreError::TypeMismatch {
                    column: column.name.clone(),
                    expected: "DATETIME",
                    found: format!("literal {:?}", literal),
                })
            }),
    }
}
