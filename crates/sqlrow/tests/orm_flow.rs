use sqlrow::mock::MockConnection;
use sqlrow::prelude::*;
use sqlrow::{QueryType, SharedDb};
use std::sync::Arc;

fn blog(conn: &MockConnection) -> (Db, Arc<Model>, Arc<Model>) {
    let mut db = Db::new(conn.clone());
    let author = db.register(Model::new("Author").has_many("posts"));
    let post = db.register(
        Model::new("Post")
            .belongs_to("author")
            .handler("stamp", |_db, _row, data| {
                Ok(data.set("updated_at", raw("NOW()")))
            })
            .before_save("stamp")
            .accessor("summary", |db, row, _args| {
                let author = row
                    .get(db, "author")?
                    .and_then(Field::into_record)
                    .and_then(|a| a.value("name").cloned())
                    .unwrap_or(Value::Null);
                Ok(Field::from(format!(
                    "{} by {}",
                    row.value("title").map(Value::to_string).unwrap_or_default(),
                    author
                )))
            }),
    );
    (db, author, post)
}

#[test]
fn create_read_update_destroy() {
    let conn = MockConnection::new();
    conn.set_next_insert_id(7);
    conn.on_query(
        "post.post_id = 7",
        vec![Data::new().set("post_id", 7).set("author_id", 1).set("title", "Hi")],
    );
    conn.on_query(
        "author.author_id = 1",
        vec![Data::new().set("author_id", 1).set("name", "Ann")],
    );
    let (mut db, author, post) = blog(&conn);

    let ann = author.find(&mut db, 1).unwrap().unwrap();
    let created = post
        .create(&mut db, [("title", Field::from("Hi")), ("author", Field::from(ann))])
        .unwrap()
        .unwrap();

    let summary = created.get(&mut db, "summary").unwrap().unwrap();
    assert_eq!(summary.as_value(), Some(&Value::from("Hi by Ann")));

    created.update(&mut db, Data::new().set("title", "Hello")).unwrap();
    created.destroy(&mut db).unwrap();

    assert_eq!(
        conn.executed(),
        [
            "SELECT * FROM author WHERE author.author_id = 1 LIMIT 1",
            r#"INSERT INTO post (title,author_id) VALUES ("Hi",1)"#,
            "SELECT * FROM post WHERE post.post_id = 7 LIMIT 1",
            "SELECT * FROM author WHERE author.author_id = 1 LIMIT 1",
            r#"UPDATE post SET title = "Hello", updated_at = NOW() WHERE post_id = 7"#,
            "DELETE FROM post WHERE post_id = 7",
        ]
    );
    let info = db.runtime_info();
    assert_eq!(info.count(QueryType::Select), 3);
    assert_eq!(info.since(5), ["DELETE FROM post WHERE post_id = 7"]);
}

#[test]
fn has_many_scope_counts_children() {
    let conn = MockConnection::new();
    conn.on_query("COUNT(", vec![Data::new().set("count", 2)]);
    let (mut db, author, _) = blog(&conn);

    let ann = Record::new(author, Data::new().set("author_id", 1));
    let posts = ann.get(&mut db, "posts").unwrap().unwrap().into_scope().unwrap();
    assert_eq!(posts.count(&mut db, FindOptions::new()).unwrap(), 2);
    assert_eq!(
        conn.executed(),
        ["SELECT COUNT(post.post_id) AS count FROM post WHERE author_id = 1"]
    );
}

#[test]
fn eager_loading_feeds_accessors_without_extra_queries() {
    let conn = MockConnection::new();
    conn.on_query(
        "IN (",
        vec![Data::new().set("author_id", 1).set("name", "Ann")],
    );
    conn.on_query(
        "FROM post",
        vec![
            Data::new().set("post_id", 1).set("author_id", 1).set("title", "A"),
            Data::new().set("post_id", 2).set("author_id", 1).set("title", "B"),
        ],
    );
    let (mut db, _, post) = blog(&conn);

    let posts = post
        .find_all(&mut db, FindOptions::new().include("author").limit(10))
        .unwrap();
    let before = db.runtime_info().total;

    let summaries: Vec<String> = posts
        .iter()
        .map(|p| p.get(&mut db, "summary").unwrap().unwrap().as_value().unwrap().to_string())
        .collect();

    assert_eq!(summaries, ["A by Ann", "B by Ann"]);
    assert_eq!(before, 2);
    assert_eq!(db.runtime_info().total, 2);
    assert_eq!(
        conn.executed(),
        [
            "SELECT * FROM post LIMIT 10",
            "SELECT * FROM author WHERE ( author_id IN (1) )",
        ]
    );
}

#[test]
fn shared_context_serializes_model_calls() {
    let conn = MockConnection::new();
    let (db, _, post) = blog(&conn);
    let shared = SharedDb::from(db);

    let handles: Vec<_> = (1..=3)
        .map(|id| {
            let shared = shared.clone();
            let post = Arc::clone(&post);
            std::thread::spawn(move || shared.with(|db| post.find(db, id).map(|r| r.is_none())))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().unwrap());
    }

    let mut executed = conn.executed();
    executed.sort();
    assert_eq!(
        executed,
        [
            "SELECT * FROM post WHERE post.post_id = 1 LIMIT 1",
            "SELECT * FROM post WHERE post.post_id = 2 LIMIT 1",
            "SELECT * FROM post WHERE post.post_id = 3 LIMIT 1",
        ]
    );
}
