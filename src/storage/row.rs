//! Fixed-width binary row codec
//!
//! A row is the concatenation of its column encodings in schema order,
//! with no header, separator, or checksum:
//!
//! - INTEGER: i32, 4 bytes little-endian
//! - VARCHAR(n): exactly n bytes; longer values are silently truncated,
//!   shorter values right-padded with ASCII spaces
//! - DATETIME: i64 seconds since the Unix epoch, 8 bytes little-endian
//!
//! The silent VARCHAR truncation is load-bearing: existing data files were
//! written that way and the codec must stay byte-compatible with them.

use crate::schema::{row_width, Column, ColumnType, Value};

use super::errors::{StoreError, StoreResult};

/// Validates a row's values against the schema without encoding anything.
///
/// A DATETIME column accepts either a `Timestamp` or a `Text` value in the
/// engine's timestamp format; everything else must match its column type
/// exactly.
pub fn validate_row(columns: &[Column], values: &[Value]) -> StoreResult<()> {
    if columns.len() != values.len() {
        return Err(StoreError::RowArity {
            expected: columns.len(),
            found: values.len(),
        });
    }

    for (column, value) in columns.iter().zip(values) {
        match (&column.column_type, value) {
            (ColumnType::Integer, Value::Integer(_)) => {}
            (ColumnType::Varchar { .. }, Value::Text(_)) => {}
            (ColumnType::Datetime, Value::Timestamp(_)) => {}
            (ColumnType::Datetime, Value::Text(text)) => {
                if Value::parse_timestamp(text).is_none() {
                    return Err(StoreError::TypeMismatch {
                        column: column.name.clone(),
                        expected: "DATETIME",
                        found: format!("unparseable text {:?}", text),
                    });
                }
            }
            (expected, found) => {
                return Err(StoreError::TypeMismatch {
                    column: column.name.clone(),
                    expected: expected.type_name(),
                    found: found.type_name().to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Encodes a typed row into its fixed-width binary form.
pub fn encode_row(columns: &[Column], values: &[Value]) -> StoreResult<Vec<u8>> {
    validate_row(columns, values)?;

    let mut buf = Vec::with_capacity(row_width(columns));
    for (column, value) in columns.iter().zip(values) {
        match (&column.column_type, value) {
            (ColumnType::Integer, Value::Integer(i)) => {
                buf.extend_from_slice(&i.to_le_bytes());
            }
            (ColumnType::Varchar { size }, Value::Text(text)) => {
                let width = *size as usize;
                let raw = text.as_bytes();
                if raw.len() >= width {
                    buf.extend_from_slice(&raw[..width]);
                } else {
                    buf.extend_from_slice(raw);
                    buf.resize(buf.len() + width - raw.len(), b' ');
                }
            }
            (ColumnType::Datetime, Value::Timestamp(ts)) => {
                buf.extend_from_slice(&ts.and_utc().timestamp().to_le_bytes());
            }
            (ColumnType::Datetime, Value::Text(text)) => {
                // validate_row guarantees the text parses
                let ts = Value::parse_timestamp(text).ok_or_else(|| StoreError::TypeMismatch {
                    column: column.name.clone(),
                    expected: "DATETIME",
                    found: format!("unparseable text {:?}", text),
                })?;
                buf.extend_from_slice(&ts.and_utc().timestamp().to_le_bytes());
            }
            _ => unreachable!("validate_row rejects mismatched variants"),
        }
    }

    Ok(buf)
}

/// Decodes one fixed-width row back into typed values.
///
/// Fails with `CorruptRecord` if the buffer ends before a column's declared
/// width has been consumed.
pub fn decode_row(columns: &[Column], bytes: &[u8]) -> StoreResult<Vec<Value>> {
    let mut values = Vec::with_capacity(columns.len());
    let mut pos = 0usize;

    for column in columns {
        let width = column.width();
        if pos + width > bytes.len() {
            return Err(StoreError::short_record(
                &column.name,
                width,
                bytes.len() - pos,
            ));
        }
        let field = &bytes[pos..pos + width];
        pos += width;

        let value = match column.column_type {
            ColumnType::Integer => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(field);
                Value::Integer(i32::from_le_bytes(raw))
            }
            ColumnType::Varchar { .. } => {
                let text = String::from_utf8_lossy(field);
                Value::Text(text.trim_end_matches(' ').to_string())
            }
            ColumnType::Datetime => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(field);
                let secs = i64::from_le_bytes(raw);
                let ts = chrono::DateTime::from_timestamp(secs, 0).ok_or_else(|| {
                    StoreError::CorruptRecord {
                        reason: format!(
                            "column {} holds out-of-range timestamp {}",
                            column.name, secs
                        ),
                    }
                })?;
                Value::Timestamp(ts.naive_utc())
            }
        };
        values.push(value);
    }

    Ok(values)
}
