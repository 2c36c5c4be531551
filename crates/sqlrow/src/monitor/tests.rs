use super::*;

#[test]
fn test_query_type_detection() {
    assert_eq!(QueryType::from_sql("SELECT * FROM users"), QueryType::Select);
    assert_eq!(QueryType::from_sql("  select * FROM users"), QueryType::Select);
    assert_eq!(
        QueryType::from_sql("INSERT INTO users (name) VALUES (\"a\")"),
        QueryType::Insert
    );
    assert_eq!(QueryType::from_sql("UPDATE users SET name = \"a\""), QueryType::Update);
    assert_eq!(QueryType::from_sql("/* audit */ DELETE FROM users"), QueryType::Delete);
    assert_eq!(QueryType::from_sql("CREATE TABLE users"), QueryType::Other);
    assert_eq!(QueryType::from_sql("-- only a comment"), QueryType::Other);
}

#[test]
fn test_statement_log_runtime_info() {
    let mut log = StatementLog::new();
    log.record("SELECT * FROM a");
    log.record("DELETE FROM a WHERE id = 1");
    log.record("SELECT * FROM b");

    let info = log.runtime_info();
    assert_eq!(info.total, 3);
    assert_eq!(info.statements[1], "DELETE FROM a WHERE id = 1");
    assert_eq!(info.count(QueryType::Select), 2);
    assert_eq!(info.count(QueryType::Delete), 1);
    assert_eq!(info.since(2), ["SELECT * FROM b".to_string()]);
    assert!(info.since(10).is_empty());
    assert_eq!(log.last(), Some("SELECT * FROM b"));
}

#[test]
fn test_truncate_sql_bytes_respects_char_boundary() {
    assert_eq!(truncate_sql_bytes("SELECT 1", 20), "SELECT 1");
    assert_eq!(truncate_sql_bytes("héllo", 2), "h");
}
