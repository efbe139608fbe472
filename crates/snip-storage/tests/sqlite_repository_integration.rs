use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use snip_core::ShortCode;
use snip_storage::{Insertion, Repository, SqliteRepository, StorageError};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    repo: SqliteRepository,
}

impl Fixture {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let repo = open(&dir).await;
        repo.create_schema().await.expect("create schema");
        Self { dir, repo }
    }

    async fn count_rows(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
            .fetch_one(self.repo.pool())
            .await
            .expect("count rows")
    }
}

async fn open(dir: &TempDir) -> SqliteRepository {
    let url = format!("sqlite://{}", dir.path().join("snip.db").display());
    SqliteRepository::connect(&url).await.expect("connect sqlite")
}

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

#[tokio::test]
async fn create_schema_is_idempotent() {
    let fixture = Fixture::start().await;

    fixture.repo.create_schema().await.unwrap();
    fixture.repo.create_schema().await.unwrap();

    assert_eq!(fixture.count_rows().await, 0);
}

#[tokio::test]
async fn insert_and_find_record() {
    let fixture = Fixture::start().await;
    let before = Timestamp::now() - SignedDuration::from_secs(1);

    let outcome = fixture
        .repo
        .insert_or_ignore("https://example.com", &code("mwyISoQ"))
        .await
        .unwrap();
    assert_eq!(outcome, Insertion::Created);

    let got = fixture
        .repo
        .find_by_code(&code("mwyISoQ"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(got.url, "https://example.com");
    assert_eq!(got.short_code, code("mwyISoQ"));
    assert!(got.id >= 1);
    assert!(got.created_at >= before);

    let by_url = fixture
        .repo
        .find_by_url("https://example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_url, got);
}

#[tokio::test]
async fn find_returns_none_for_unknown_keys() {
    let fixture = Fixture::start().await;

    assert!(fixture
        .repo
        .find_by_code(&code("doesNotExist"))
        .await
        .unwrap()
        .is_none());
    assert!(fixture
        .repo
        .find_by_url("https://unknown.example")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn duplicate_url_is_ignored_and_keeps_first_code() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert_or_ignore("https://example.com", &code("first"))
        .await
        .unwrap();
    let outcome = fixture
        .repo
        .insert_or_ignore("https://example.com", &code("second"))
        .await
        .unwrap();

    assert_eq!(outcome, Insertion::AlreadyExists);
    assert_eq!(fixture.count_rows().await, 1);
    let stored = fixture
        .repo
        .find_by_url("https://example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.short_code, code("first"));
}

#[tokio::test]
async fn short_code_collision_is_reported() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert_or_ignore("https://one.example", &code("same"))
        .await
        .unwrap();
    let err = fixture
        .repo
        .insert_or_ignore("https://two.example", &code("same"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
    assert!(!fixture.repo.exists("https://two.example").await.unwrap());
}

#[tokio::test]
async fn exists_tracks_inserted_urls() {
    let fixture = Fixture::start().await;

    assert!(!fixture.repo.exists("https://example.com").await.unwrap());
    fixture
        .repo
        .insert_or_ignore("https://example.com", &code("abc"))
        .await
        .unwrap();
    assert!(fixture.repo.exists("https://example.com").await.unwrap());
}

#[tokio::test]
async fn concurrent_inserts_of_same_url_leave_one_row() {
    let fixture = Fixture::start().await;
    let repo = Arc::new(fixture.repo.clone());

    let mut handles = vec![];
    for _ in 0..16 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.insert_or_ignore("https://race.example", &code("raceCode"))
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_created() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(fixture.count_rows().await, 1);
}

#[tokio::test]
async fn records_survive_reconnect() {
    let fixture = Fixture::start().await;
    fixture
        .repo
        .insert_or_ignore("https://durable.example", &code("durable"))
        .await
        .unwrap();
    fixture.repo.pool().close().await;

    let reopened = open(&fixture.dir).await;
    reopened.create_schema().await.unwrap();

    let got = reopened.find_by_code(&code("durable")).await.unwrap().unwrap();
    assert_eq!(got.url, "https://durable.example");
}
