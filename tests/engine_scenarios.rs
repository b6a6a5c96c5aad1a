//! End-to-end operation scenarios
//!
//! Drives the executor with structured operation descriptors the way the
//! (external) SQL translation layer would, and checks the observable
//! results: row text, statuses, and on-disk row counts.

use flintdb::config::EngineConfig;
use flintdb::executor::{
    Assignment, Operation, OperationStatus, OrderBy, QueryExecutor,
};
use flintdb::schema::{Column, Value};
use flintdb::storage::TableStore;
use tempfile::TempDir;

fn open_store() -> (TempDir, TableStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TableStore::open(&EngineConfig::new(dir.path())).unwrap();
    (dir, store)
}

fn users_table() -> Vec<Column> {
    vec![Column::integer("ID"), Column::varchar("NAME", 10)]
}

fn create_users(executor: &mut QueryExecutor<'_>) {
    let result = executor.execute(&Operation::CreateDatabase { name: "D".into() });
    assert_eq!(result.status, OperationStatus::Success);
    let result = executor.execute(&Operation::CreateTable {
        database: "D".into(),
        table: "T".into(),
        columns: users_table(),
    });
    assert_eq!(result.status, OperationStatus::Success);
}

fn insert(executor: &mut QueryExecutor<'_>, id: i32, name: &str) -> OperationStatus {
    executor
        .execute(&Operation::Insert {
            database: "D".into(),
            table: "T".into(),
            values: vec![Value::Integer(id), Value::from(name)],
        })
        .status
}

fn select(
    executor: &mut QueryExecutor<'_>,
    predicate: Option<&str>,
    order_by: Option<OrderBy>,
) -> flintdb::executor::OperationResult {
    executor.execute(&Operation::Select {
        database: "D".into(),
        table: "T".into(),
        columns: vec![],
        predicate: predicate.map(str::to_string),
        order_by,
    })
}

#[test]
fn insert_then_select_roundtrip() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);

    assert_eq!(insert(&mut executor, 1, "Ann"), OperationStatus::Success);

    let result = select(&mut executor, None, None);
    assert_eq!(result.status, OperationStatus::Success);
    assert_eq!(result.rows.as_deref(), Some("1, Ann"));
}

#[test]
fn duplicate_id_rejected_and_table_unchanged() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);

    assert_eq!(insert(&mut executor, 1, "Ann"), OperationStatus::Success);

    let result = executor.execute(&Operation::Insert {
        database: "D".into(),
        table: "T".into(),
        values: vec![Value::Integer(1), Value::from("Bob")],
    });
    assert_eq!(result.status, OperationStatus::Error);
    assert!(result.message.contains("1"));

    // Exactly one row survives.
    let result = select(&mut executor, None, None);
    assert_eq!(result.rows.as_deref(), Some("1, Ann"));
}

#[test]
fn duplicate_values_allowed_without_id_column() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    executor.execute(&Operation::CreateDatabase { name: "D".into() });
    executor.execute(&Operation::CreateTable {
        database: "D".into(),
        table: "T".into(),
        columns: vec![Column::integer("CODE"), Column::varchar("NAME", 10)],
    });

    for _ in 0..2 {
        let result = executor.execute(&Operation::Insert {
            database: "D".into(),
            table: "T".into(),
            values: vec![Value::Integer(1), Value::from("Ann")],
        });
        assert_eq!(result.status, OperationStatus::Success);
    }

    let result = select(&mut executor, None, None);
    assert_eq!(result.rows.as_deref(), Some("1, Ann\n1, Ann"));
}

#[test]
fn order_by_name_ascending() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);
    insert(&mut executor, 1, "b");
    insert(&mut executor, 2, "a");

    let result = select(&mut executor, None, Some(OrderBy::asc("NAME")));
    assert_eq!(result.status, OperationStatus::Success);
    assert_eq!(result.rows.as_deref(), Some("2, a\n1, b"));
}

#[test]
fn order_by_descending_reverses() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);
    insert(&mut executor, 1, "a");
    insert(&mut executor, 2, "b");

    let result = select(&mut executor, None, Some(OrderBy::desc("ID")));
    assert_eq!(result.rows.as_deref(), Some("2, b\n1, a"));
}

#[test]
fn update_only_matching_rows() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);
    insert(&mut executor, 1, "a");
    insert(&mut executor, 2, "b");

    let result = executor.execute(&Operation::Update {
        database: "D".into(),
        table: "T".into(),
        assignments: vec![Assignment::new("NAME", "Z")],
        predicate: Some("ID > 1".into()),
    });
    assert_eq!(result.status, OperationStatus::Success);
    assert_eq!(result.message, "Rows updated successfully.");

    let result = select(&mut executor, None, None);
    assert_eq!(result.rows.as_deref(), Some("1, a\n2, Z"));
}

#[test]
fn update_with_empty_predicate_hits_every_row() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);
    insert(&mut executor, 1, "a");
    insert(&mut executor, 2, "b");

    executor.execute(&Operation::Update {
        database: "D".into(),
        table: "T".into(),
        assignments: vec![Assignment::new("NAME", "all")],
        predicate: None,
    });

    let result = select(&mut executor, None, None);
    assert_eq!(result.rows.as_deref(), Some("1, all\n2, all"));
}

#[test]
fn delete_with_predicate_removes_only_matches() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);
    insert(&mut executor, 1, "a");
    insert(&mut executor, 2, "b");
    insert(&mut executor, 3, "c");

    let result = executor.execute(&Operation::Delete {
        database: "D".into(),
        table: "T".into(),
        predicate: Some("ID != 2".into()),
    });
    assert_eq!(result.status, OperationStatus::Success);
    assert_eq!(result.message, "Rows deleted successfully.");

    let result = select(&mut executor, None, None);
    assert_eq!(result.rows.as_deref(), Some("2, b"));
}

#[test]
fn delete_everything_with_empty_predicate() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);
    insert(&mut executor, 1, "a");
    insert(&mut executor, 2, "b");

    executor.execute(&Operation::Delete {
        database: "D".into(),
        table: "T".into(),
        predicate: None,
    });

    let result = select(&mut executor, None, None);
    assert_eq!(result.rows.as_deref(), Some(""));
}

#[test]
fn select_with_like_predicate() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);
    insert(&mut executor, 1, "Annabel");
    insert(&mut executor, 2, "Bob");
    insert(&mut executor, 3, "Anton");

    let result = select(&mut executor, Some("NAME LIKE 'An%'"), None);
    assert_eq!(result.rows.as_deref(), Some("1, Annabel\n3, Anton"));
}

#[test]
fn set_database_validates_existence() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);

    let result = executor.execute(&Operation::SetDatabase { name: "ghost".into() });
    assert_eq!(result.status, OperationStatus::Error);

    executor.execute(&Operation::CreateDatabase { name: "D".into() });
    let result = executor.execute(&Operation::SetDatabase { name: "D".into() });
    assert_eq!(result.status, OperationStatus::Success);
}

#[test]
fn drop_table_requires_empty() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);
    insert(&mut executor, 1, "Ann");

    let drop = Operation::DropTable {
        database: "D".into(),
        table: "T".into(),
    };
    let result = executor.execute(&drop);
    assert_eq!(result.status, OperationStatus::Error);
    assert!(result.message.contains("not empty"));

    executor.execute(&Operation::Delete {
        database: "D".into(),
        table: "T".into(),
        predicate: None,
    });
    let result = executor.execute(&drop);
    assert_eq!(result.status, OperationStatus::Success);
}

#[test]
fn datetime_columns_compare_chronologically() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    executor.execute(&Operation::CreateDatabase { name: "D".into() });
    executor.execute(&Operation::CreateTable {
        database: "D".into(),
        table: "T".into(),
        columns: vec![Column::integer("ID"), Column::datetime("AT")],
    });

    for (id, at) in [(1, "2024-01-05 09:00:00"), (2, "2024-03-01 09:00:00")] {
        let result = executor.execute(&Operation::Insert {
            database: "D".into(),
            table: "T".into(),
            values: vec![Value::Integer(id), Value::from(at)],
        });
        assert_eq!(result.status, OperationStatus::Success);
    }

    let result = executor.execute(&Operation::Select {
        database: "D".into(),
        table: "T".into(),
        columns: vec![],
        predicate: Some("AT > '2024-02-01 00:00:00'".into()),
        order_by: None,
    });
    assert_eq!(result.rows.as_deref(), Some("2, 2024-03-01 09:00:00"));
}

#[test]
fn create_index_lifecycle() {
    let (_dir, store) = open_store();
    let mut executor = QueryExecutor::new(&store);
    create_users(&mut executor);
    insert(&mut executor, 1, "Ann");

    let result = executor.execute(&Operation::CreateIndex {
        database: "D".into(),
        table: "T".into(),
        column: "ID".into(),
        index_name: "idx_t_id".into(),
        index_type: "BTREE".into(),
    });
    assert_eq!(result.status, OperationStatus::Success);

    // Subsequent inserts feed the index entry file.
    insert(&mut executor, 2, "Bob");
    let entries = store.indexes().read_entries("D", "T", "ID").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "2");

    // Unknown column is a hard error.
    let result = executor.execute(&Operation::CreateIndex {
        database: "D".into(),
        table: "T".into(),
        column: "AGE".into(),
        index_name: "idx_t_age".into(),
        index_type: "BST".into(),
    });
    assert_eq!(result.status, OperationStatus::Error);
}
