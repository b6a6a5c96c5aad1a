//! Column and value types for the flat-file table engine
//!
//! Every column type has a fixed on-disk width:
//! - INTEGER: 4 bytes (i32, little-endian)
//! - VARCHAR(n): exactly n bytes, space-padded
//! - DATETIME: 8 bytes (i64 seconds since the Unix epoch, little-endian)
//!
//! The row width of a table is the sum of its column widths, so record
//! boundaries are computed arithmetically and never stored.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Textual form used for DATETIME values everywhere they surface as text:
/// result rendering, predicate comparison, and literal parsing.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Supported column types. The on-disk width is fully determined by the
/// type; for VARCHAR, by the declared capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ColumnType {
    /// 4-byte signed integer
    Integer,
    /// Fixed-capacity text, space-padded on disk
    Varchar {
        /// Declared capacity in bytes
        size: u32,
    },
    /// Calendar timestamp with second precision
    Datetime,
}

impl ColumnType {
    /// Convenience constructor for VARCHAR(n)
    pub fn varchar(size: u32) -> Self {
        ColumnType::Varchar { size }
    }

    /// On-disk width in bytes
    pub fn width(&self) -> usize {
        match self {
            ColumnType::Integer => 4,
            ColumnType::Varchar { size } => *size as usize,
            ColumnType::Datetime => 8,
        }
    }

    /// SQL-facing type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Varchar { .. } => "VARCHAR",
            ColumnType::Datetime => "DATETIME",
        }
    }

    /// Single-byte tag used by the catalog wire format
    pub fn tag(&self) -> u8 {
        match self {
            ColumnType::Integer => 0,
            ColumnType::Varchar { .. } => 1,
            ColumnType::Datetime => 2,
        }
    }

    /// Reconstructs a type from a catalog tag and stored width.
    ///
    /// Returns `None` for an unknown tag.
    pub fn from_tag(tag: u8, width: u32) -> Option<Self> {
        match tag {
            0 => Some(ColumnType::Integer),
            1 => Some(ColumnType::Varchar { size: width }),
            2 => Some(ColumnType::Datetime),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Varchar { size } => write!(f, "VARCHAR({})", size),
            other => write!(f, "{}", other.type_name()),
        }
    }
}

/// A named, typed column within a table schema.
///
/// Column names are unique within a table; the engine matches names
/// case-insensitively wherever a descriptor refers to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Column type, which fixes the on-disk width
    pub column_type: ColumnType,
}

impl Column {
    /// Create a column of any type
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// Create an INTEGER column
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    /// Create a VARCHAR(n) column
    pub fn varchar(name: impl Into<String>, size: u32) -> Self {
        Self::new(name, ColumnType::Varchar { size })
    }

    /// Create a DATETIME column
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Datetime)
    }

    /// On-disk width in bytes
    pub fn width(&self) -> usize {
        self.column_type.width()
    }
}

/// Total encoded width of one row under the given schema.
pub fn row_width(columns: &[Column]) -> usize {
    columns.iter().map(Column::width).sum()
}

/// Position of a named column within a schema, matched case-insensitively.
pub fn column_position(columns: &[Column], name: &str) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(name))
}

/// A typed runtime value crossing the catalog boundary.
///
/// Closed variant set: values are validated against the column type at the
/// storage boundary, so a mismatch is an explicit error rather than a
/// silently coerced write.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// INTEGER value
    Integer(i32),
    /// VARCHAR value (pre-truncation; the codec pads/trims on disk)
    Text(String),
    /// DATETIME value
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Runtime type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Text(_) => "TEXT",
            Value::Timestamp(_) => "TIMESTAMP",
        }
    }

    /// Parses a DATETIME literal in the engine's textual form.
    pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT).ok()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(DATETIME_FORMAT)),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}
