use async_trait::async_trait;
use jiff::Timestamp;
use shortwave_core::error::{Result, StorageError};
use shortwave_core::repository::Repository;
use shortwave_core::shortcode::ShortCode;
use shortwave_core::{Context, UrlMapping};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_CONNECTION_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// PostgreSQL implementation of the repository contract.
///
/// `store` wraps the original-URL re-check and the insert in a single
/// transaction; the unique constraint on `short_code` is the backstop
/// that turns a concurrent insert race into a detectable conflict. The
/// transaction rolls back on drop, so every exit path before the commit
/// releases its resources.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a repository from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new connection pool with bounded
    /// connection lifetime and acquire timeout.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .max_lifetime(MAX_CONNECTION_LIFETIME)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get(&self, ctx: &Context, code: &ShortCode) -> Result<Option<UrlMapping>> {
        ctx.ensure_active()?;

        let row = ctx
            .run(
                sqlx::query(
                    r#"
                    SELECT id, short_code, original_url, created_at
                    FROM url_mappings
                    WHERE short_code = $1
                    "#,
                )
                .bind(code.as_str())
                .fetch_optional(&self.pool),
            )
            .await?
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
        let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
        let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

        Ok(Some(UrlMapping {
            id,
            short_code: ShortCode::new_unchecked(short_code),
            original_url,
            created_at: parse_created_at(created_at_raw)?,
        }))
    }

    async fn find_by_original_url(
        &self,
        ctx: &Context,
        original_url: &str,
    ) -> Result<Option<ShortCode>> {
        ctx.ensure_active()?;

        let row = ctx
            .run(
                sqlx::query(
                    r#"
                    SELECT short_code
                    FROM url_mappings
                    WHERE original_url = $1
                    LIMIT 1
                    "#,
                )
                .bind(original_url)
                .fetch_optional(&self.pool),
            )
            .await?
            .map_err(map_sqlx_error)?;

        row.map(|row| {
            let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
            Ok(ShortCode::new_unchecked(short_code))
        })
        .transpose()
    }

    async fn store(&self, ctx: &Context, code: &ShortCode, original_url: &str) -> Result<i64> {
        ctx.ensure_active()?;

        let mut tx = ctx
            .run(self.pool.begin())
            .await?
            .map_err(map_sqlx_error)?;

        // Re-check dedup inside the transaction: a concurrent shorten of
        // the same URL may have won since the service's pre-check.
        let existing = ctx
            .run(
                sqlx::query(
                    r#"
                    SELECT short_code
                    FROM url_mappings
                    WHERE original_url = $1
                    LIMIT 1
                    "#,
                )
                .bind(original_url)
                .fetch_optional(&mut *tx),
            )
            .await?
            .map_err(map_sqlx_error)?;

        if let Some(row) = existing {
            let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
            // Dropping `tx` rolls the transaction back.
            return Err(StorageError::OriginalUrlMapped {
                existing: ShortCode::new_unchecked(short_code),
            });
        }

        let inserted = ctx
            .run(
                sqlx::query(
                    r#"
                    INSERT INTO url_mappings (short_code, original_url)
                    VALUES ($1, $2)
                    RETURNING id
                    "#,
                )
                .bind(code.as_str())
                .bind(original_url)
                .fetch_one(&mut *tx),
            )
            .await?;

        let id: i64 = match inserted {
            Ok(row) => row.try_get("id").map_err(map_sqlx_error)?,
            Err(err) if is_unique_violation(&err) => {
                return Err(StorageError::CodeConflict(code.clone()));
            }
            Err(err) => return Err(map_sqlx_error(err)),
        };

        ctx.run(tx.commit()).await?.map_err(map_sqlx_error)?;

        Ok(id)
    }

    async fn close(&self) {
        // `PgPool::close` is idempotent.
        self.pool.close().await;
    }
}
