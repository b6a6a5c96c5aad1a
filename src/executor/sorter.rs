//! Type-aware stable sorting for Select results
//!
//! Rows are sorted before projection, keyed off the schema type of the
//! ORDER BY column, so sorting works even when the sort column is not
//! projected. The sort is stable: equal keys keep their file order.

use std::cmp::Ordering;

use crate::schema::{ColumnType, Value};

use super::operation::SortDirection;

/// Sorts decoded rows on one column, stably.
pub fn sort_rows(
    rows: &mut [Vec<Value>],
    key: usize,
    column_type: &ColumnType,
    direction: SortDirection,
) {
    rows.sort_by(|a, b| {
        let ordering = compare_typed(&a[key], &b[key], column_type);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Compares two values under the sort column's declared type.
///
/// Values always match their column type after a successful decode, so the
/// fallback comparison on rendered text only fires for mixed variants.
fn compare_typed(a: &Value, b: &Value, column_type: &ColumnType) -> Ordering {
    match (column_type, a, b) {
        (ColumnType::Integer, Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (ColumnType::Datetime, Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (ColumnType::Varchar { .. }, Value::Text(x), Value::Text(y)) => {
            x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase())
        }
        _ => a.to_string().cmp(&b.to_string()),
    }
}
