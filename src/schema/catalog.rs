//! Append-only schema catalog
//!
//! One entry per `define` call, framed as:
//!
//! ```text
//! +------------------+
//! | Database Name    | (length-prefixed string)
//! +------------------+
//! | Table Name       | (length-prefixed string)
//! +------------------+
//! | Column Count     | (u32 LE)
//! +------------------+
//! | Columns...       | (name: length-prefixed string, type tag: u8,
//! |                  |  width: u32 LE)
//! +------------------+
//! ```
//!
//! `define` never checks for an existing entry; duplicate definitions are
//! legal and resolved at lookup time by first-match-wins on a forward scan.
//! Entries are never rewritten or pruned, so a redefined or dropped table
//! leaves its old entries behind.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{CatalogError, CatalogResult};
use super::types::{Column, ColumnType};

/// Append-only registry mapping (database, table) to an ordered column list.
///
/// The catalog holds no open handles; every call opens, uses, and closes the
/// backing file within its own lifetime.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
}

impl Catalog {
    /// Creates a catalog backed by the given file path.
    ///
    /// The file itself is created lazily on the first `define`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one schema entry for (database, table).
    ///
    /// Duplicate definitions are not rejected here; `lookup` resolves the
    /// ambiguity by returning the first match.
    pub fn define(&self, database: &str, table: &str, columns: &[Column]) -> CatalogResult<()> {
        let mut frame = Vec::new();
        write_string(&mut frame, database);
        write_string(&mut frame, table);
        frame.extend_from_slice(&(columns.len() as u32).to_le_bytes());
        for column in columns {
            write_string(&mut frame, &column.name);
            frame.push(column.column_type.tag());
            frame.extend_from_slice(&(column.width() as u32).to_le_bytes());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&frame)?;
        file.sync_all()?;
        Ok(())
    }

    /// Scans entries in append order and returns the column list of the
    /// first (database, table) match.
    ///
    /// Returns an empty list when no entry matches; callers treat that as
    /// "table has no schema" (zero-column tables are rejected at creation).
    pub fn lookup(&self, database: &str, table: &str) -> CatalogResult<Vec<Column>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut cursor = FrameCursor::new(&bytes);
        while !cursor.at_end() {
            let entry_offset = cursor.offset();
            let db = cursor.read_string("database name")?;
            let tbl = cursor.read_string("table name")?;
            let count = cursor.read_u32("column count")?;

            let matches = db == database && tbl == table;
            let mut columns = Vec::with_capacity(if matches { count as usize } else { 0 });
            for _ in 0..count {
                let name = cursor.read_string("column name")?;
                let tag = cursor.read_u8("column type tag")?;
                let width = cursor.read_u32("column width")?;
                if matches {
                    let column_type = ColumnType::from_tag(tag, width).ok_or_else(|| {
                        CatalogError::CorruptEntry {
                            offset: entry_offset,
                            reason: format!("unknown column type tag {}", tag),
                        }
                    })?;
                    columns.push(Column::new(name, column_type));
                }
            }

            if matches {
                return Ok(columns);
            }
        }

        Ok(Vec::new())
    }
}

/// Appends a u32-length-prefixed UTF-8 string to the frame buffer.
fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// Forward-only reader over catalog frames with offset-bearing errors.
pub(crate) struct FrameCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FrameCursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn offset(&self) -> u64 {
        self.pos as u64
    }

    fn short(&self, reason: &str) -> CatalogError {
        CatalogError::CorruptEntry {
            offset: self.pos as u64,
            reason: format!("unexpected end of file while reading {}", reason),
        }
    }

    pub(crate) fn read_u8(&mut self, what: &str) -> CatalogResult<u8> {
        if self.pos + 1 > self.bytes.len() {
            return Err(self.short(what));
        }
        let v = self.bytes[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub(crate) fn read_u32(&mut self, what: &str) -> CatalogResult<u32> {
        if self.pos + 4 > self.bytes.len() {
            return Err(self.short(what));
        }
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.bytes[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(u32::from_le_bytes(raw))
    }

    pub(crate) fn read_u64(&mut self, what: &str) -> CatalogResult<u64> {
        if self.pos + 8 > self.bytes.len() {
            return Err(self.short(what));
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.bytes[self.pos..self.pos + 8]);
        self.pos += 8;
        Ok(u64::from_le_bytes(raw))
    }

    pub(crate) fn read_string(&mut self, what: &str) -> CatalogResult<String> {
        let len = self.read_u32(what)? as usize;
        if self.pos + len > self.bytes.len() {
            return Err(self.short(what));
        }
        let s = String::from_utf8_lossy(&self.bytes[self.pos..self.pos + len]).into_owned();
        self.pos += len;
        Ok(s)
    }
}
