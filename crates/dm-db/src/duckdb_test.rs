use super::*;

fn count(db: &DuckDbBackend, table: &str) -> i64 {
    let row = db
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), &[])
        .unwrap()
        .unwrap();
    row[0].parse().unwrap()
}

#[test]
fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert_eq!(db.database_name(), "main");
    assert!(!db.in_transaction());
}

#[test]
fn test_new_memory_path() {
    let db = DuckDbBackend::new(":memory:").unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").unwrap();
    assert_eq!(count(&db, "t"), 0);
}

#[test]
fn test_with_schema() {
    let db = DuckDbBackend::in_memory().unwrap().with_schema("app");
    assert_eq!(db.database_name(), "app");
}

#[test]
fn test_execute_with_params() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (name VARCHAR)").unwrap();

    let affected = db
        .execute("INSERT INTO t VALUES (?), (?)", &["a", "b"])
        .unwrap();
    assert_eq!(affected, 2);
    assert_eq!(count(&db, "t"), 2);
}

#[test]
fn test_execute_error_carries_sql() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute("INSERT INTO missing VALUES (1)", &[]).unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
    assert!(err.to_string().contains("INSERT INTO missing"));
}

#[test]
fn test_execute_batch() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);",
    )
    .unwrap();

    assert_eq!(count(&db, "t1"), 1);
    assert_eq!(count(&db, "t2"), 0);
}

#[test]
fn test_query_row_renders_columns() {
    let db = DuckDbBackend::in_memory().unwrap();
    let row = db
        .query_row("SELECT 42 AS n, 'x' AS s, NULL AS z", &[])
        .unwrap()
        .unwrap();
    assert_eq!(row, vec!["42", "x", "null"]);
}

#[test]
fn test_query_row_with_params() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (name VARCHAR); INSERT INTO t VALUES ('a'), ('b');")
        .unwrap();
    let row = db
        .query_row("SELECT name FROM t WHERE name = ?", &["b"])
        .unwrap();
    assert_eq!(row, Some(vec!["b".to_string()]));
}

#[test]
fn test_query_row_empty() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").unwrap();
    assert_eq!(db.query_row("SELECT id FROM t", &[]).unwrap(), None);
}

#[test]
fn test_commit_persists() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").unwrap();

    db.start_transaction().unwrap();
    assert!(db.in_transaction());
    db.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
    db.commit().unwrap();

    assert!(!db.in_transaction());
    assert_eq!(count(&db, "t"), 1);
}

#[test]
fn test_rollback_discards() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").unwrap();

    db.start_transaction().unwrap();
    db.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
    db.rollback().unwrap();

    assert!(!db.in_transaction());
    assert_eq!(count(&db, "t"), 0);
}

#[test]
fn test_rollback_discards_ddl() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.start_transaction().unwrap();
    db.execute_batch("CREATE TABLE created_in_tx (id INT)").unwrap();
    db.rollback().unwrap();

    let row = db
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
            &["created_in_tx"],
        )
        .unwrap()
        .unwrap();
    assert_eq!(row[0], "0");
}

#[test]
fn test_commit_without_transaction() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.commit().unwrap_err();
    assert!(matches!(err, DbError::NoTransaction { operation: "commit" }));
}

#[test]
fn test_rollback_without_transaction() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(matches!(
        db.rollback().unwrap_err(),
        DbError::NoTransaction { .. }
    ));
}

#[test]
fn test_nested_transaction_rejected() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.start_transaction().unwrap();
    assert!(matches!(
        db.start_transaction().unwrap_err(),
        DbError::TransactionAlreadyOpen
    ));
    db.rollback().unwrap();
}

#[test]
fn test_from_path_persists_across_connections() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute_batch("CREATE TABLE t (id INT); INSERT INTO t VALUES (7);")
            .unwrap();
    }
    let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    assert_eq!(count(&db, "t"), 1);
}
