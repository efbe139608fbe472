use std::sync::Arc;
use std::time::Duration;

use snip_cache::MokaUrlCache;
use snip_core::{Repository, Shortener, ShortenerError};
use snip_generator::Sha256Generator;
use snip_shortener::ShortenerService;
use snip_storage::SqliteRepository;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    url: String,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("snip.db").display());
        Self { _dir: dir, url }
    }

    async fn repository(&self) -> SqliteRepository {
        let repo = SqliteRepository::connect(&self.url)
            .await
            .expect("Failed to open database");
        repo.create_schema().await.expect("Failed to create schema");
        repo
    }
}

#[tokio::test]
async fn test_sqlite_backed_round_trip() {
    let fixture = Fixture::new();
    let service = ShortenerService::new(fixture.repository().await, Sha256Generator::new())
        .with_cache(MokaUrlCache::new(), Duration::from_secs(60));

    let code = service.shorten("example.com").await.unwrap();
    assert_eq!(code.as_str(), "mwyISoQ");
    assert_eq!(service.resolve("mwyISoQ").await.unwrap(), "example.com");
    assert_eq!(service.shorten("example.com").await.unwrap(), code);

    let err = service.resolve("doesNotExist").await.unwrap_err();
    assert!(matches!(err, ShortenerError::NotFound(_)));
}

#[tokio::test]
async fn test_codes_survive_restart() {
    let fixture = Fixture::new();

    let code = {
        let service = ShortenerService::new(fixture.repository().await, Sha256Generator::new());
        service.shorten("https://www.rust-lang.org").await.unwrap()
    };

    let service = ShortenerService::new(fixture.repository().await, Sha256Generator::new());
    assert_eq!(
        service.resolve(code.as_str()).await.unwrap(),
        "https://www.rust-lang.org"
    );
}

#[tokio::test]
async fn test_concurrent_shorten_stores_single_record() {
    let fixture = Fixture::new();
    let service = Arc::new(ShortenerService::new(
        fixture.repository().await,
        Sha256Generator::new(),
    ));

    let mut handles = vec![];
    for _ in 0..16 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.shorten("https://concurrent.example").await
        }));
    }

    let mut codes = vec![];
    for handle in handles {
        codes.push(handle.await.unwrap().unwrap());
    }
    assert!(codes.windows(2).all(|pair| pair[0] == pair[1]));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
        .fetch_one(service.repository().pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}
