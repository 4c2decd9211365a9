//! PostgreSQL implementation of the entry repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Entry, NewEntry};
use crate::domain::repositories::EntryRepository;
use crate::error::AppError;

/// PostgreSQL repository for entries.
///
/// `(url_type, short_code)` is the primary key of `url_entries`, so the
/// conditional insert is a single `ON CONFLICT DO NOTHING` statement and click
/// appends are a single `array_append` update.
pub struct PgEntryRepository {
    pool: Arc<PgPool>,
}

impl PgEntryRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct EntryRow {
    url_type: String,
    short_code: String,
    url: String,
    name: Option<String>,
    expiry_date: Option<DateTime<Utc>>,
    click_dates: Vec<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Entry {
            short_code: row.short_code,
            url_type: row.url_type,
            url: row.url,
            name: row.name,
            expiry_date: row.expiry_date,
            click_dates: row.click_dates,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn insert_if_absent(&self, new_entry: &NewEntry) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO url_entries (url_type, short_code, url, name, expiry_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (url_type, short_code) DO NOTHING
            "#,
        )
        .bind(&new_entry.url_type)
        .bind(&new_entry.short_code)
        .bind(&new_entry.url)
        .bind(&new_entry.name)
        .bind(new_entry.expiry_date)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_code(&self, url_type: &str, code: &str) -> Result<Option<Entry>, AppError> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT url_type, short_code, url, name, expiry_date, click_dates, created_at
            FROM url_entries
            WHERE url_type = $1 AND short_code = $2
            "#,
        )
        .bind(url_type)
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Entry::from))
    }

    async fn exists(&self, url_type: &str, code: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM url_entries WHERE url_type = $1 AND short_code = $2)",
        )
        .bind(url_type)
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn list(&self, url_type: &str) -> Result<Vec<Entry>, AppError> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT url_type, short_code, url, name, expiry_date, click_dates, created_at
            FROM url_entries
            WHERE url_type = $1
            ORDER BY created_at, short_code
            "#,
        )
        .bind(url_type)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Entry::from).collect())
    }

    async fn list_codes(&self, url_type: &str) -> Result<Vec<String>, AppError> {
        let codes: Vec<String> =
            sqlx::query_scalar("SELECT short_code FROM url_entries WHERE url_type = $1")
                .bind(url_type)
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(codes)
    }

    async fn count(&self, url_type: &str) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_entries WHERE url_type = $1")
            .bind(url_type)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn delete(&self, url_type: &str, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM url_entries WHERE url_type = $1 AND short_code = $2")
            .bind(url_type)
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_click(
        &self,
        url_type: &str,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE url_entries
            SET click_dates = array_append(click_dates, $3)
            WHERE url_type = $1 AND short_code = $2
            "#,
        )
        .bind(url_type)
        .bind(code)
        .bind(at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_types(&self) -> Result<Vec<String>, AppError> {
        let types: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT url_type FROM url_entries ORDER BY url_type")
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(types)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
