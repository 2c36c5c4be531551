use criterion::{
    BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main,
};
use sqlrow::mock::MockConnection;
use sqlrow::{Data, Db, FindOptions, Model, Value, escape_string};

/// `n` equality predicates: col0 = 0 AND col1 = "v1" AND ...
fn filter_data(n: usize) -> Data {
    (0..n)
        .map(|i| {
            let value = if i % 2 == 0 {
                Value::Int(i as i64)
            } else {
                Value::from(format!("v{i}"))
            };
            (format!("col{i}"), value)
        })
        .collect()
}

/// A context per iteration keeps the statement log from growing across samples.
fn fresh_db() -> Db {
    Db::new(MockConnection::new())
}

fn bench_select_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/select_cycle");

    for n in [1, 5, 10, 50] {
        let data = filter_data(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter_batched(
                fresh_db,
                |mut db| {
                    let cursor = db
                        .select("t.*")
                        .join("u", "u.t_id = t.id")
                        .and_where(data)
                        .order("t.id", "DESC")
                        .limit(10, 20)
                        .get("t");
                    black_box(cursor.map(|c| c.row_count()).ok());
                    db
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_insert_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/insert");

    for n in [1, 10, 50] {
        let data = filter_data(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter_batched(
                fresh_db,
                |mut db| {
                    black_box(db.create("t", data).ok());
                    db
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_escape(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/escape");

    for len in [16, 256, 4096] {
        let input: String = "it's \"quoted\"\n".chars().cycle().take(len).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &input, |b, input| {
            b.iter(|| black_box(escape_string(input)));
        });
    }

    group.finish();
}

fn bench_eager_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("orm/eager_load");

    for n in [10, 100] {
        let authors: Vec<Data> = (0..n / 2)
            .map(|i| Data::new().set("author_id", i as i64).set("name", format!("a{i}")))
            .collect();
        let posts: Vec<Data> = (0..n)
            .map(|i| Data::new().set("post_id", i as i64).set("author_id", (i / 2) as i64))
            .collect();
        let setup = || {
            let conn = MockConnection::new();
            conn.on_query("IN (", authors.clone());
            conn.on_query("FROM post", posts.clone());
            let mut db = Db::new(conn);
            db.register(Model::new("Author"));
            let post = db.register(Model::new("Post").belongs_to("author"));
            (db, post)
        };

        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter_batched(
                &setup,
                |(mut db, post)| {
                    let rows = post.find_all(&mut db, FindOptions::new().include("author"));
                    black_box(rows.map(|r| r.len()).ok());
                    db
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_select_cycle,
    bench_insert_render,
    bench_escape,
    bench_eager_load
);
criterion_main!(benches);
