//! Integration tests for the PostgreSQL repository.
//!
//! These require a reachable PostgreSQL server. Set
//! `SHORTWAVE_TEST_DATABASE_URL` to run them; they are skipped otherwise.

use shortwave_core::{Context, ShortCode, StorageError};
use shortwave_generator::{Generator, RandomGenerator};
use shortwave_storage::{PostgresRepository, Repository};
use sqlx::postgres::PgPoolOptions;

const DATABASE_URL_ENV: &str = "SHORTWAVE_TEST_DATABASE_URL";

struct Fixture {
    repo: PostgresRepository,
}

impl Fixture {
    async fn start() -> Option<Self> {
        let url = match std::env::var(DATABASE_URL_ENV) {
            Ok(url) => url,
            Err(_) => {
                eprintln!("skipping: {DATABASE_URL_ENV} not set");
                return None;
            }
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .expect("connect postgres");

        sqlx::raw_sql(include_str!("../ddl/postgres/url_mappings.sql"))
            .execute(&pool)
            .await
            .expect("create schema");

        Some(Self {
            repo: PostgresRepository::new(pool),
        })
    }
}

/// Generates values unique per test run so the suite can run against a
/// shared database without truncation.
fn fresh_code() -> ShortCode {
    RandomGenerator::new().generate()
}

fn fresh_url(label: &str) -> String {
    format!("https://{label}.example.com/{}", fresh_code())
}

#[tokio::test]
async fn store_and_get_roundtrip() {
    let Some(fixture) = Fixture::start().await else {
        return;
    };
    let ctx = Context::background();
    let code = fresh_code();
    let url = fresh_url("roundtrip");

    let id = fixture.repo.store(&ctx, &code, &url).await.unwrap();
    assert!(id > 0);

    let mapping = fixture.repo.get(&ctx, &code).await.unwrap().unwrap();
    assert_eq!(mapping.id, id);
    assert_eq!(mapping.short_code, code);
    assert_eq!(mapping.original_url, url);
}

#[tokio::test]
async fn get_unknown_code_returns_none() {
    let Some(fixture) = Fixture::start().await else {
        return;
    };
    let ctx = Context::background();

    let mapping = fixture.repo.get(&ctx, &fresh_code()).await.unwrap();
    assert!(mapping.is_none());
}

#[tokio::test]
async fn duplicate_code_is_a_conflict() {
    let Some(fixture) = Fixture::start().await else {
        return;
    };
    let ctx = Context::background();
    let code = fresh_code();

    fixture
        .repo
        .store(&ctx, &code, &fresh_url("conflict-a"))
        .await
        .unwrap();
    let err = fixture
        .repo
        .store(&ctx, &code, &fresh_url("conflict-b"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::CodeConflict(_)));
}

#[tokio::test]
async fn duplicate_url_exposes_existing_code() {
    let Some(fixture) = Fixture::start().await else {
        return;
    };
    let ctx = Context::background();
    let first = fresh_code();
    let url = fresh_url("dedup");

    fixture.repo.store(&ctx, &first, &url).await.unwrap();
    let err = fixture
        .repo
        .store(&ctx, &fresh_code(), &url)
        .await
        .unwrap_err();

    match err {
        StorageError::OriginalUrlMapped { existing } => assert_eq!(existing, first),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn find_by_original_url_probe() {
    let Some(fixture) = Fixture::start().await else {
        return;
    };
    let ctx = Context::background();
    let code = fresh_code();
    let url = fresh_url("probe");

    assert!(fixture
        .repo
        .find_by_original_url(&ctx, &url)
        .await
        .unwrap()
        .is_none());

    fixture.repo.store(&ctx, &code, &url).await.unwrap();

    let found = fixture
        .repo
        .find_by_original_url(&ctx, &url)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, code);
}

#[tokio::test]
async fn racing_stores_for_one_code_admit_exactly_one() {
    let Some(fixture) = Fixture::start().await else {
        return;
    };
    let code = fresh_code();

    let mut handles = Vec::new();
    for i in 0..8 {
        let repo = fixture.repo.clone();
        let code = code.clone();
        let url = fresh_url(&format!("race-{i}"));
        handles.push(tokio::spawn(async move {
            let ctx = Context::background();
            repo.store(&ctx, &code, &url).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
}

#[tokio::test]
async fn close_is_idempotent() {
    let Some(fixture) = Fixture::start().await else {
        return;
    };

    fixture.repo.close().await;
    fixture.repo.close().await;
}
