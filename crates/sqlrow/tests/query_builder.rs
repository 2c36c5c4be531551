use sqlrow::{Connection, Data, Db, DbConfig, OrmError, OrmResult, Outcome, VecCursor, fetch_all, raw};

/// Connection with ANSI-style quote doubling instead of backslash escapes.
#[derive(Default)]
struct AnsiConnection {
    executed: Vec<String>,
    rows: Vec<Data>,
}

impl Connection for AnsiConnection {
    fn escape(&self, value: &str) -> String {
        value.replace('"', "\"\"")
    }

    fn execute(&mut self, sql: &str) -> OrmResult<Outcome> {
        self.executed.push(sql.to_string());
        if sql.contains("missing_table") {
            return Err(OrmError::query("relation does not exist"));
        }
        if sql.starts_with("SELECT") {
            return Ok(Outcome::Rows(Box::new(VecCursor::new(self.rows.clone()))));
        }
        Ok(Outcome::Affected(2))
    }

    fn last_insert_id(&self) -> Option<i64> {
        None
    }
}

fn sql_of(db: &Db) -> &str {
    db.statement_log().last().unwrap_or_default()
}

#[test]
fn escaping_goes_through_the_connection() {
    let mut db = Db::new(AnsiConnection::default());
    db.and_where(("title", r#"say "hi""#)).get("post").unwrap();
    assert_eq!(sql_of(&db), r#"SELECT * FROM post WHERE title = "say ""hi""""#);
}

#[test]
fn rows_come_back_through_the_cursor() {
    let conn = AnsiConnection {
        rows: vec![
            Data::new().set("id", 1).set("name", "a"),
            Data::new().set("id", 2).set("name", "b"),
        ],
        ..AnsiConnection::default()
    };
    let mut db = Db::new(conn);

    let mut cursor = db.select("id, name").order_asc("id").get("t").unwrap();
    assert_eq!(cursor.row_count(), 2);
    let rows = fetch_all(cursor.as_mut()).unwrap();
    assert_eq!(rows[1].get("name").and_then(|v| v.as_str()), Some("b"));
    assert!(cursor.fetch_next().unwrap().is_none());
}

#[test]
fn affected_counts_are_returned() {
    let mut db = Db::new(AnsiConnection::default());
    let data = Data::new().set("hits", raw("hits + 1"));
    assert_eq!(db.update_where("page", &data, ("slug", "home")).unwrap(), 2);
    assert_eq!(
        sql_of(&db),
        r#"UPDATE page SET hits = hits + 1 WHERE slug = "home""#
    );
    assert_eq!(db.destroy_where("page", "hits = 0").unwrap(), 2);
}

#[test]
fn errors_propagate_and_state_is_clean_afterwards() {
    let mut db = Db::new(AnsiConnection::default());
    let err = db
        .and_where(("id", 1))
        .limit(1, 0)
        .get("missing_table")
        .err()
        .unwrap();
    assert!(err.is_query());
    assert_eq!(err.to_string(), "Query error: relation does not exist");

    db.get("present").unwrap();
    assert_eq!(sql_of(&db), "SELECT * FROM present");
}

#[test]
fn booleans_nulls_and_floats_render_bare() {
    let mut db = Db::new(AnsiConnection::default());
    let data = Data::new()
        .set("active", true)
        .set("deleted_at", Option::<i64>::None)
        .set("ratio", 0.5);
    db.create("flags", &data).unwrap();
    assert_eq!(
        sql_of(&db),
        "INSERT INTO flags (active,deleted_at,ratio) VALUES (1,NULL,0.5)"
    );
}

#[test]
fn schema_statements_respect_the_flag() {
    let mut db = Db::new(AnsiConnection::default());
    db.create_table("audit", true).unwrap();
    assert!(db.statement_log().is_empty());

    let mut db = Db::new(AnsiConnection::default())
        .with_config(DbConfig::new().allow_manipulation(true));
    db.create_table("audit", true).unwrap();
    db.add_column("audit", &[("note", "TEXT NULL".into())]).unwrap();
    assert_eq!(
        db.runtime_info().statements,
        [
            "CREATE TABLE IF NOT EXISTS audit",
            "ALTER TABLE audit ADD note TEXT NULL",
        ]
    );
}
