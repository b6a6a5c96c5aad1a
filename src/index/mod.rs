//! Secondary index surface (stub)
//!
//! CreateIndex records intent; Insert appends index entries; nothing reads
//! them back for query acceleration. The [`IndexBackend`] trait is the
//! substitution point: a real ordered structure can replace [`NoopIndex`]
//! without touching the executor.

mod registry;

pub use registry::IndexRegistry;

/// Recorded intent to accelerate lookups on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    /// Database the indexed table lives in
    pub database: String,
    /// Indexed table
    pub table: String,
    /// Indexed column
    pub column: String,
    /// Author-chosen index name
    pub index_name: String,
    /// Declared index flavor (e.g. BTREE, BST); informational only here
    pub index_type: String,
}

impl IndexDescriptor {
    /// Creates a descriptor.
    pub fn new(
        database: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
        index_name: impl Into<String>,
        index_type: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            column: column.into(),
            index_name: index_name.into(),
            index_type: index_type.into(),
        }
    }

    /// Whether this descriptor covers (database, table, column).
    ///
    /// Column names are matched case-insensitively, like every other
    /// identifier reference in the engine.
    pub fn covers(&self, database: &str, table: &str, column: &str) -> bool {
        self.database == database
            && self.table == table
            && self.column.eq_ignore_ascii_case(column)
    }
}

/// In-memory lookup structure behind the index surface.
///
/// `insert` is called with the rendered key and row offset on every Insert
/// into an indexed column; `lookup` returns candidate row offsets.
pub trait IndexBackend {
    /// Records one key at a row offset.
    fn insert(&mut self, key: &str, offset: u64);

    /// Returns every recorded offset for a key.
    fn lookup(&self, key: &str) -> Vec<u64>;
}

/// Default backend: records nothing, accelerates nothing.
///
/// The durable index entry files are still written by the registry, so a
/// future backend can rebuild itself from disk.
#[derive(Debug, Default)]
pub struct NoopIndex;

impl IndexBackend for NoopIndex {
    fn insert(&mut self, _key: &str, _offset: u64) {}

    fn lookup(&self, _key: &str) -> Vec<u64> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_covers() {
        let d = IndexDescriptor::new("db", "users", "ID", "idx", "BTREE");
        assert!(d.covers("db", "users", "ID"));
        assert!(d.covers("db", "users", "id"));
        assert!(!d.covers("db", "users", "NAME"));
        assert!(!d.covers("other", "users", "ID"));
    }

    #[test]
    fn test_noop_backend_records_nothing() {
        let mut backend = NoopIndex;
        backend.insert("1", 0);
        assert!(backend.lookup("1").is_empty());
    }
}
