//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, service wiring and the Axum server lifecycle.

use crate::application::services::{AuthService, ShortenerService};
use crate::config::{Config, StoreBackend};
use crate::domain::repositories::EntryRepository;
use crate::infrastructure::persistence::{MemoryEntryRepository, PgEntryRepository, pool};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Opens the configured entry store.
///
/// For PostgreSQL this connects (with retries) and applies migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn EntryRepository>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store backend")?;
            let pool = pool::connect(database_url, &config.pool).await?;
            tracing::info!("Connected to database");
            let repository: Arc<dyn EntryRepository> =
                Arc::new(PgEntryRepository::new(Arc::new(pool)));
            Ok(repository)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; entries are lost on restart");
            let repository: Arc<dyn EntryRepository> = Arc::new(MemoryEntryRepository::new());
            Ok(repository)
        }
    }
}

/// Wires the services around a store.
///
/// # Errors
///
/// Returns an error if the short code settings are invalid.
pub fn build_state(config: &Config, repository: Arc<dyn EntryRepository>) -> Result<AppState> {
    let shortener = ShortenerService::new(repository, config.code_generator()?)
        .with_max_attempts(config.max_generation_attempts)
        .with_expiry_enforced(config.enforce_expiry);

    let generator = shortener.generator();
    tracing::info!(
        length = generator.length(),
        alphabet = generator.alphabet().len(),
        codespace = ?generator.codespace_size(),
        "Short code generator ready"
    );

    Ok(AppState::new(
        Arc::new(shortener),
        Arc::new(AuthService::new(&config.api_key)),
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be opened
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;
    let state = build_state(&config, repository)?;

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
