//! Table store: one directory per database, one data file per table
//!
//! Layout under the configured data root:
//!
//! ```text
//! <data_root>/
//!   system/
//!     schema.cat            schema catalog (append-only)
//!     indexes.cat           index descriptor catalog (append-only)
//!     <db>_<table>_<col>.idx  per-index entry files (append-only)
//!   <database>/
//!     <table>.tbl           back-to-back fixed-width records
//! ```
//!
//! File handles are opened, used, and closed within each operation; the
//! store keeps no long-lived handles and no in-memory row cache. There is
//! no file locking either: concurrent mutations against the same table
//! must be serialized by the caller.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::index::IndexRegistry;
use crate::observability::Logger;
use crate::schema::{row_width, Catalog, Column, Value};

use super::errors::{StoreError, StoreResult};
use super::row::{decode_row, encode_row};

/// File extension for table data files
const TABLE_EXT: &str = "tbl";
/// Directory holding the catalogs and index files
const SYSTEM_DIR: &str = "system";

/// What a rewrite callback decides for each row it is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum RewriteDecision {
    /// Re-emit the row unchanged
    Keep,
    /// Replace the row with new values (same schema, same width)
    Replace(Vec<Value>),
    /// Drop the row from the table
    Remove,
}

/// The flat-file table store.
///
/// Explicitly constructed from an [`EngineConfig`] and passed by reference
/// into the executor; its lifecycle is owned by the caller rather than by a
/// lazily created process-wide singleton.
#[derive(Debug)]
pub struct TableStore {
    data_root: PathBuf,
    catalog: Catalog,
    indexes: IndexRegistry,
}

impl TableStore {
    /// Opens (and if necessary initializes) a store rooted at the
    /// configured data directory.
    pub fn open(config: &EngineConfig) -> StoreResult<Self> {
        let data_root = config.data_root.clone();
        let system_dir = data_root.join(SYSTEM_DIR);
        fs::create_dir_all(&system_dir)?;

        Ok(Self {
            catalog: Catalog::new(system_dir.join("schema.cat")),
            indexes: IndexRegistry::new(&system_dir),
            data_root,
        })
    }

    /// Root directory that databases live under.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// The shared schema catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The index descriptor registry.
    pub fn indexes(&self) -> &IndexRegistry {
        &self.indexes
    }

    fn database_path(&self, database: &str) -> PathBuf {
        self.data_root.join(database)
    }

    /// Path of a table's data file.
    pub fn table_path(&self, database: &str, table: &str) -> PathBuf {
        self.database_path(database)
            .join(format!("{}.{}", table, TABLE_EXT))
    }

    /// Creates a new database namespace.
    pub fn create_database(&self, name: &str) -> StoreResult<()> {
        let path = self.database_path(name);
        if path.exists() {
            return Err(StoreError::DatabaseAlreadyExists(name.to_string()));
        }
        fs::create_dir_all(&path)?;
        Logger::info("DATABASE_CREATED", &[("database", name)]);
        Ok(())
    }

    /// Pure existence check.
    pub fn database_exists(&self, name: &str) -> bool {
        self.database_path(name).is_dir()
    }

    /// Validates that a database exists before it is used as a context.
    pub fn set_database(&self, name: &str) -> StoreResult<()> {
        if self.database_exists(name) {
            Ok(())
        } else {
            Err(StoreError::DatabaseNotFound(name.to_string()))
        }
    }

    /// Creates a table: an empty data file plus one catalog entry.
    ///
    /// The data file is created before the catalog entry is appended; a
    /// crash between the two leaves a file without a schema, which lookups
    /// report as "table has no schema".
    pub fn create_table(
        &self,
        database: &str,
        table: &str,
        columns: &[Column],
    ) -> StoreResult<()> {
        if !self.database_exists(database) {
            return Err(StoreError::DatabaseNotFound(database.to_string()));
        }
        if columns.is_empty() {
            return Err(StoreError::NoColumnsDefined);
        }

        let path = self.table_path(database, table);
        if path.exists() {
            return Err(StoreError::TableAlreadyExists(table.to_string()));
        }

        File::create(&path)?;
        self.catalog.define(database, table, columns)?;
        Logger::info(
            "TABLE_CREATED",
            &[
                ("database", database),
                ("table", table),
                ("columns", &columns.len().to_string()),
            ],
        );
        Ok(())
    }

    /// Deletes an empty table's data file.
    ///
    /// The catalog entry is intentionally left behind; lookups for a
    /// re-created table of the same name will resolve to the old entry
    /// first. Known gap, preserved for compatibility.
    pub fn drop_table(&self, database: &str, table: &str) -> StoreResult<()> {
        let path = self.table_path(database, table);
        if !path.exists() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        if fs::metadata(&path)?.len() > 0 {
            return Err(StoreError::TableNotEmpty(table.to_string()));
        }
        fs::remove_file(&path)?;
        Logger::info("TABLE_DROPPED", &[("database", database), ("table", table)]);
        Ok(())
    }

    /// Resolves a table's schema, treating an empty catalog result as
    /// "table does not exist".
    pub fn table_schema(&self, database: &str, table: &str) -> StoreResult<Vec<Column>> {
        let columns = self.catalog.lookup(database, table)?;
        if columns.is_empty() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        Ok(columns)
    }

    /// Appends one already-encoded row and returns the byte offset it was
    /// written at (used for index bookkeeping).
    pub fn append_row(&self, database: &str, table: &str, encoded: &[u8]) -> StoreResult<u64> {
        let path = self.table_path(database, table);
        if !path.exists() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }

        let mut file = OpenOptions::new().append(true).open(&path)?;
        let offset = file.seek(SeekFrom::End(0))?;
        file.write_all(encoded)?;
        file.sync_all()?;
        Ok(offset)
    }

    /// Opens a lazy, one-shot scan over a table's rows in file order.
    ///
    /// Each item is the row's byte offset plus its decoded values. The scan
    /// is not restartable; reopen it to scan again.
    pub fn scan(&self, database: &str, table: &str) -> StoreResult<RowScan> {
        let columns = self.table_schema(database, table)?;
        let path = self.table_path(database, table);
        if !path.exists() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }

        let file = File::open(&path)?;
        let file_len = file.metadata()?.len();
        Ok(RowScan {
            file,
            file_len,
            offset: 0,
            columns,
            done: false,
        })
    }

    /// Reads every row, asks the callback what to do with it, and replaces
    /// the file contents only if at least one row changed.
    ///
    /// Returns whether anything changed. When nothing changed the file is
    /// left untouched, so a no-op Update/Delete leaves it byte-identical.
    pub fn rewrite<F, E>(&self, database: &str, table: &str, mut decide: F) -> Result<bool, E>
    where
        F: FnMut(u64, &[Value]) -> Result<RewriteDecision, E>,
        E: From<StoreError>,
    {
        let columns = self.table_schema(database, table).map_err(E::from)?;
        let width = row_width(&columns);
        let path = self.table_path(database, table);
        if !path.exists() {
            return Err(E::from(StoreError::TableNotFound(table.to_string())));
        }

        let bytes = fs::read(&path).map_err(|e| E::from(StoreError::Io(e)))?;
        let mut survivors: Vec<u8> = Vec::with_capacity(bytes.len());
        let mut changed = false;
        let mut offset = 0usize;

        while offset < bytes.len() {
            if offset + width > bytes.len() {
                return Err(E::from(StoreError::CorruptRecord {
                    reason: format!(
                        "trailing {} bytes at offset {} are shorter than the row width {}",
                        bytes.len() - offset,
                        offset,
                        width
                    ),
                }));
            }
            let raw = &bytes[offset..offset + width];
            let values = decode_row(&columns, raw).map_err(E::from)?;

            match decide(offset as u64, &values)? {
                RewriteDecision::Keep => survivors.extend_from_slice(raw),
                RewriteDecision::Replace(new_values) => {
                    let encoded = encode_row(&columns, &new_values).map_err(E::from)?;
                    survivors.extend_from_slice(&encoded);
                    changed = true;
                }
                RewriteDecision::Remove => changed = true,
            }
            offset += width;
        }

        if changed {
            // Truncate-and-write-back; no torn-write guarantee is made here
            // because there is no WAL to recover from.
            let mut file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&path)
                .map_err(|e| E::from(StoreError::Io(e)))?;
            file.write_all(&survivors)
                .map_err(|e| E::from(StoreError::Io(e)))?;
            file.sync_all().map_err(|e| E::from(StoreError::Io(e)))?;
        }

        Ok(changed)
    }
}

/// Lazy forward scan over a table's fixed-width records.
#[derive(Debug)]
pub struct RowScan {
    file: File,
    file_len: u64,
    offset: u64,
    columns: Vec<Column>,
    done: bool,
}

impl RowScan {
    /// Schema the scan decodes rows with.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Row width in bytes.
    pub fn row_width(&self) -> usize {
        row_width(&self.columns)
    }
}

impl Iterator for RowScan {
    type Item = StoreResult<(u64, Vec<Value>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.file_len {
            return None;
        }

        let width = self.row_width() as u64;
        if self.file_len - self.offset < width {
            // Trailing partial record: surface once, then stop.
            self.done = true;
            return Some(Err(StoreError::CorruptRecord {
                reason: format!(
                    "trailing {} bytes at offset {} are shorter than the row width {}",
                    self.file_len - self.offset,
                    self.offset,
                    width
                ),
            }));
        }

        let mut buf = vec![0u8; width as usize];
        if let Err(e) = self.file.read_exact(&mut buf) {
            self.done = true;
            return Some(Err(StoreError::Io(e)));
        }

        let at = self.offset;
        self.offset += width;
        match decode_row(&self.columns, &buf) {
            Ok(values) => Some(Ok((at, values))),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, TableStore) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = EngineConfig::new(dir.path());
        let store = TableStore::open(&config).unwrap();
        (dir, store)
    }

    fn sample_columns() -> Vec<Column> {
        vec![Column::integer("ID"), Column::varchar("NAME", 10)]
    }

    fn insert(store: &TableStore, id: i32, name: &str) -> u64 {
        let encoded =
            encode_row(&sample_columns(), &[Value::Integer(id), Value::from(name)]).unwrap();
        store.append_row("db", "users", &encoded).unwrap()
    }

    fn setup_users(store: &TableStore) {
        store.create_database("db").unwrap();
        store.create_table("db", "users", &sample_columns()).unwrap();
    }

    #[test]
    fn test_create_database_twice_fails() {
        let (_dir, store) = temp_store();
        store.create_database("db").unwrap();
        let err = store.create_database("db").unwrap_err();
        assert!(matches!(err, StoreError::DatabaseAlreadyExists(_)));
    }

    #[test]
    fn test_set_database_requires_existence() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.set_database("nope").unwrap_err(),
            StoreError::DatabaseNotFound(_)
        ));
        store.create_database("db").unwrap();
        store.set_database("db").unwrap();
    }

    #[test]
    fn test_create_table_requires_database() {
        let (_dir, store) = temp_store();
        let err = store
            .create_table("missing", "users", &sample_columns())
            .unwrap_err();
        assert!(matches!(err, StoreError::DatabaseNotFound(_)));
    }

    #[test]
    fn test_create_table_rejects_empty_schema() {
        let (_dir, store) = temp_store();
        store.create_database("db").unwrap();
        let err = store.create_table("db", "users", &[]).unwrap_err();
        assert!(matches!(err, StoreError::NoColumnsDefined));
    }

    #[test]
    fn test_create_table_twice_fails() {
        let (_dir, store) = temp_store();
        setup_users(&store);
        let err = store
            .create_table("db", "users", &sample_columns())
            .unwrap_err();
        assert!(matches!(err, StoreError::TableAlreadyExists(_)));
    }

    #[test]
    fn test_append_returns_sequential_offsets() {
        let (_dir, store) = temp_store();
        setup_users(&store);

        assert_eq!(insert(&store, 1, "Ann"), 0);
        assert_eq!(insert(&store, 2, "Bob"), 14);
        assert_eq!(insert(&store, 3, "Cid"), 28);
    }

    #[test]
    fn test_file_length_is_multiple_of_row_width() {
        let (_dir, store) = temp_store();
        setup_users(&store);
        insert(&store, 1, "Ann");
        insert(&store, 2, "Bob");

        let len = fs::metadata(store.table_path("db", "users")).unwrap().len();
        assert_eq!(len % row_width(&sample_columns()) as u64, 0);
    }

    #[test]
    fn test_scan_decodes_in_file_order() {
        let (_dir, store) = temp_store();
        setup_users(&store);
        insert(&store, 2, "Bob");
        insert(&store, 1, "Ann");

        let rows: Vec<_> = store
            .scan("db", "users")
            .unwrap()
            .collect::<StoreResult<Vec<_>>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1[0], Value::Integer(2));
        assert_eq!(rows[1].1[0], Value::Integer(1));
        assert_eq!(rows[1].0, 14);
    }

    #[test]
    fn test_scan_unknown_table_fails() {
        let (_dir, store) = temp_store();
        store.create_database("db").unwrap();
        assert!(matches!(
            store.scan("db", "ghost").unwrap_err(),
            StoreError::TableNotFound(_)
        ));
    }

    #[test]
    fn test_scan_reports_trailing_partial_record() {
        let (_dir, store) = temp_store();
        setup_users(&store);
        insert(&store, 1, "Ann");

        // Append garbage shorter than one row.
        let path = store.table_path("db", "users");
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0xAB, 0xCD]).unwrap();

        let mut scan = store.scan("db", "users").unwrap();
        assert!(scan.next().unwrap().is_ok());
        let err = scan.next().unwrap().unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord { .. }));
        assert!(scan.next().is_none());
    }

    #[test]
    fn test_rewrite_replace_and_remove() {
        let (_dir, store) = temp_store();
        setup_users(&store);
        insert(&store, 1, "Ann");
        insert(&store, 2, "Bob");
        insert(&store, 3, "Cid");

        let changed = store
            .rewrite("db", "users", |_, values| -> StoreResult<RewriteDecision> {
                match values[0] {
                    Value::Integer(2) => Ok(RewriteDecision::Remove),
                    Value::Integer(3) => Ok(RewriteDecision::Replace(vec![
                        Value::Integer(3),
                        Value::from("Zed"),
                    ])),
                    _ => Ok(RewriteDecision::Keep),
                }
            })
            .unwrap();
        assert!(changed);

        let rows: Vec<_> = store
            .scan("db", "users")
            .unwrap()
            .collect::<StoreResult<Vec<_>>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1, vec![Value::Integer(1), Value::from("Ann")]);
        assert_eq!(rows[1].1, vec![Value::Integer(3), Value::from("Zed")]);
    }

    #[test]
    fn test_rewrite_without_changes_leaves_file_untouched() {
        let (_dir, store) = temp_store();
        setup_users(&store);
        insert(&store, 1, "Ann");

        let path = store.table_path("db", "users");
        let before = fs::read(&path).unwrap();

        let changed = store
            .rewrite("db", "users", |_, _| -> StoreResult<RewriteDecision> {
                Ok(RewriteDecision::Keep)
            })
            .unwrap();
        assert!(!changed);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_drop_table_refuses_non_empty() {
        let (_dir, store) = temp_store();
        setup_users(&store);
        insert(&store, 1, "Ann");

        let err = store.drop_table("db", "users").unwrap_err();
        assert!(matches!(err, StoreError::TableNotEmpty(_)));
    }

    #[test]
    fn test_drop_empty_table_removes_file_but_not_catalog() {
        let (_dir, store) = temp_store();
        setup_users(&store);

        store.drop_table("db", "users").unwrap();
        assert!(!store.table_path("db", "users").exists());

        // Catalog entry survives the drop.
        let columns = store.catalog().lookup("db", "users").unwrap();
        assert_eq!(columns, sample_columns());
    }

    #[test]
    fn test_drop_missing_table_fails() {
        let (_dir, store) = temp_store();
        store.create_database("db").unwrap();
        assert!(matches!(
            store.drop_table("db", "ghost").unwrap_err(),
            StoreError::TableNotFound(_)
        ));
    }
}
