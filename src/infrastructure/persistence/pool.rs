//! PostgreSQL connection pool setup.

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::config::PoolSettings;

/// Number of connection attempts after the first one fails.
const CONNECT_RETRIES: usize = 5;

/// Builds the pool and applies pending migrations.
///
/// The first connection is retried with jittered exponential backoff so the
/// service survives a database that starts a little later than it does.
///
/// # Errors
///
/// Returns an error if the database stays unreachable or a migration fails.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.connect_timeout))
        .idle_timeout(Duration::from_secs(settings.idle_timeout))
        .max_lifetime(Duration::from_secs(settings.max_lifetime));

    let pool = Retry::start(connect_backoff(), || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    Ok(pool)
}

/// Jittered delays between connection attempts, capped at five seconds.
fn connect_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(CONNECT_RETRIES)
}
