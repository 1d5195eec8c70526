//! Round trip against a real Postgres. Needs Docker:
//! `cargo test -p postings_engine --test postgres_store -- --ignored`
use chrono::{TimeZone, Utc};
use postings_core::{JobRecord, TagList};
use postings_engine::{JobStore, PgJobStore, UpsertMode, Upserter, DEFAULT_TABLE};
use sqlx::postgres::PgConnectOptions;
use sqlx::Row;
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers_modules::postgres::Postgres;

fn job(n: usize, title: &str) -> JobRecord {
    JobRecord {
        title: title.to_string(),
        company: format!("Startup {n}"),
        location: "Remote".into(),
        description: "N/A".into(),
        apply_link: format!("https://apply.example/{n}"),
        tags: TagList::new(vec!["Rust".into(), "SQL".into()]),
        pay: "Not listed".into(),
        experience: "N/A".into(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn upserts_converge_and_batches_roll_back() {
    ingest_logging::initialize_for_tests();
    let container = Postgres::default()
        .with_tag("16")
        .start()
        .await
        .expect("postgres container");
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let options = PgConnectOptions::new()
        .host("127.0.0.1")
        .port(port)
        .username("postgres")
        .password("postgres")
        .database("postgres");

    let store = PgJobStore::connect(options, DEFAULT_TABLE).await.unwrap();
    store.migrate().await.unwrap();

    let upserter = Upserter::new(&store);
    let first: Vec<_> = (1..=3).map(|n| job(n, "Engineer")).collect();
    assert!(upserter.upsert(&first, UpsertMode::Batch).await.is_complete());
    let second: Vec<_> = (1..=3).map(|n| job(n, "Staff Engineer")).collect();
    assert!(upserter.upsert(&second, UpsertMode::PerRecord).await.is_complete());

    let mut bad_batch: Vec<_> = (4..=6).map(|n| job(n, "Engineer")).collect();
    bad_batch[1].title = "x".repeat(300);
    let result = upserter.upsert(&bad_batch, UpsertMode::Batch).await;
    assert_eq!(result.written, 0);
    assert!(result.batch_error.is_some());

    store.upsert_one(&job(7, "Solo")).await.unwrap();

    let pool = sqlx::PgPool::connect_with(
        PgConnectOptions::new()
            .host("127.0.0.1")
            .port(port)
            .username("postgres")
            .password("postgres")
            .database("postgres"),
    )
    .await
    .unwrap();
    let rows = sqlx::query("SELECT apply_link, title, tags FROM jobs_job ORDER BY apply_link")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);
    let title: String = rows[0].get("title");
    assert_eq!(title, "Staff Engineer");
    let tags: sqlx::types::Json<Vec<String>> = rows[0].get("tags");
    assert_eq!(tags.0, vec!["Rust".to_string(), "SQL".to_string()]);

    store.close().await;
}
