//! Index descriptor catalog and per-index entry files
//!
//! CreateIndex appends one descriptor frame to `indexes.cat`; every Insert
//! into a table with indexed columns appends a `(key, offset)` pair to that
//! index's `.idx` file. Nothing reads the entry files back in this design:
//! they are the persistence surface a real lookup structure would be
//! rebuilt from.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::schema::FrameCursor;
use crate::storage::{StoreError, StoreResult};

use super::IndexDescriptor;

/// Registry of index descriptors plus their append-only entry files.
#[derive(Debug, Clone)]
pub struct IndexRegistry {
    system_dir: PathBuf,
}

impl IndexRegistry {
    /// Creates a registry rooted at the store's system directory.
    pub fn new(system_dir: impl Into<PathBuf>) -> Self {
        Self {
            system_dir: system_dir.into(),
        }
    }

    fn descriptor_path(&self) -> PathBuf {
        self.system_dir.join("indexes.cat")
    }

    /// Path of the entry file for one index.
    pub fn entry_path(&self, database: &str, table: &str, column: &str) -> PathBuf {
        self.system_dir
            .join(format!("{}_{}_{}.idx", database, table, column))
    }

    /// Appends one index descriptor to the catalog.
    pub fn record(&self, descriptor: &IndexDescriptor) -> StoreResult<()> {
        let mut frame = Vec::new();
        for field in [
            &descriptor.database,
            &descriptor.table,
            &descriptor.column,
            &descriptor.index_name,
            &descriptor.index_type,
        ] {
            frame.extend_from_slice(&(field.len() as u32).to_le_bytes());
            frame.extend_from_slice(field.as_bytes());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.descriptor_path())?;
        file.write_all(&frame)?;
        file.sync_all()?;
        Ok(())
    }

    /// Returns every recorded descriptor in append order.
    pub fn descriptors(&self) -> StoreResult<Vec<IndexDescriptor>> {
        let bytes = match fs::read(self.descriptor_path()) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut cursor = FrameCursor::new(&bytes);
        let mut out = Vec::new();
        while !cursor.at_end() {
            out.push(IndexDescriptor {
                database: cursor.read_string("index database")?,
                table: cursor.read_string("index table")?,
                column: cursor.read_string("index column")?,
                index_name: cursor.read_string("index name")?,
                index_type: cursor.read_string("index type")?,
            });
        }
        Ok(out)
    }

    /// Whether any descriptor covers (database, table, column).
    pub fn exists(&self, database: &str, table: &str, column: &str) -> StoreResult<bool> {
        Ok(self
            .descriptors()?
            .iter()
            .any(|d| d.covers(database, table, column)))
    }

    /// Descriptors covering any column of (database, table).
    pub fn for_table(&self, database: &str, table: &str) -> StoreResult<Vec<IndexDescriptor>> {
        Ok(self
            .descriptors()?
            .into_iter()
            .filter(|d| d.database == database && d.table == table)
            .collect())
    }

    /// Appends one `(key, offset)` entry to an index's entry file.
    pub fn append_entry(
        &self,
        database: &str,
        table: &str,
        column: &str,
        key: &str,
        offset: u64,
    ) -> StoreResult<()> {
        let mut frame = Vec::new();
        frame.extend_from_slice(&(key.len() as u32).to_le_bytes());
        frame.extend_from_slice(key.as_bytes());
        frame.extend_from_slice(&offset.to_le_bytes());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.entry_path(database, table, column))?;
        file.write_all(&frame)?;
        file.sync_all()?;
        Ok(())
    }

    /// Reads back every `(key, offset)` entry of one index file.
    ///
    /// Used by tests and by any backend that rebuilds itself from disk;
    /// the engine itself never consults entries for query execution.
    pub fn read_entries(
        &self,
        database: &str,
        table: &str,
        column: &str,
    ) -> StoreResult<Vec<(String, u64)>> {
        let bytes = match fs::read(self.entry_path(database, table, column)) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut cursor = FrameCursor::new(&bytes);
        let mut out = Vec::new();
        while !cursor.at_end() {
            let key = cursor.read_string("index entry key")?;
            let offset = cursor.read_u64("index entry offset")?;
            out.push((key, offset));
        }
        Ok(out)
    }
}

/// Registry helpers only used by the system directory layout.
impl IndexRegistry {
    /// System directory the registry writes under.
    pub fn system_dir(&self) -> &Path {
        &self.system_dir
    }
}
