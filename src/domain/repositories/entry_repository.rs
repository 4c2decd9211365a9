//! Repository trait for entry storage.

use crate::domain::entities::{Entry, NewEntry};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Store contract required by the shortener.
///
/// Every operation except [`EntryRepository::list_types`] is scoped to one
/// `url_type` namespace.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgEntryRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryEntryRepository`] - in-process map
/// - Test mocks available with `cfg(test)`
///
/// # Errors
///
/// All methods return [`AppError::StoreUnavailable`] when the backing store
/// fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Inserts the entry only if its code is still free in its namespace.
    ///
    /// Returns `Ok(false)` when another writer already holds the code. The
    /// check and the write are a single atomic step in the store.
    async fn insert_if_absent(&self, new_entry: &NewEntry) -> Result<bool, AppError>;

    async fn find_by_code(&self, url_type: &str, code: &str) -> Result<Option<Entry>, AppError>;

    async fn exists(&self, url_type: &str, code: &str) -> Result<bool, AppError>;

    /// Lists the namespace ordered by `created_at`, then `short_code`.
    async fn list(&self, url_type: &str) -> Result<Vec<Entry>, AppError>;

    /// Lists only the codes held in the namespace.
    async fn list_codes(&self, url_type: &str) -> Result<Vec<String>, AppError>;

    async fn count(&self, url_type: &str) -> Result<u64, AppError>;

    /// Removes the entry. Returns `Ok(false)` if it did not exist.
    async fn delete(&self, url_type: &str, code: &str) -> Result<bool, AppError>;

    /// Atomically appends `at` to the entry's click history.
    ///
    /// Returns `Ok(false)` if the entry does not exist.
    async fn append_click(
        &self,
        url_type: &str,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    /// Distinct `url_type` values across all namespaces.
    async fn list_types(&self) -> Result<Vec<String>, AppError>;

    /// Returns true if the store answers a trivial query.
    async fn health_check(&self) -> bool;
}
