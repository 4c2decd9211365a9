//! Short code creation, lookup, click tracking and category listing.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Entry, NewEntry};
use crate::domain::repositories::EntryRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;

/// Largest codespace the service will enumerate to claim the last free codes.
pub const EXHAUSTIVE_CLAIM_LIMIT: u128 = 65_536;

/// Default number of random candidates tried before enumerating.
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Long-lived service shared by all requests.
///
/// Configured once with the store handle, the code generator and the expiry
/// policy. Every operation except [`Self::list_categories`] is scoped to the
/// `url_type` it receives.
pub struct ShortenerService<R: EntryRepository + ?Sized> {
    repository: Arc<R>,
    generator: CodeGenerator,
    max_attempts: usize,
    enforce_expiry: bool,
}

impl<R: EntryRepository + ?Sized> ShortenerService<R> {
    /// Creates a service with the default attempt ceiling and informational expiry.
    pub fn new(repository: Arc<R>, generator: CodeGenerator) -> Self {
        Self {
            repository,
            generator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            enforce_expiry: false,
        }
    }

    /// Sets how many random candidates `create` tries before enumerating.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// When enabled, [`Self::resolve`] treats expired entries as missing.
    pub fn with_expiry_enforced(mut self, enforce_expiry: bool) -> Self {
        self.enforce_expiry = enforce_expiry;
        self
    }

    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }

    pub async fn exists(&self, url_type: &str, code: &str) -> Result<bool, AppError> {
        self.repository.exists(url_type, code).await
    }

    /// Returns the stored entry without recording a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no entry holds `code` in `url_type`.
    pub async fn get(&self, url_type: &str, code: &str) -> Result<Entry, AppError> {
        self.repository
            .find_by_code(url_type, code)
            .await?
            .ok_or_else(|| not_found(url_type, code))
    }

    pub async fn get_all(&self, url_type: &str) -> Result<Vec<Entry>, AppError> {
        self.repository.list(url_type).await
    }

    /// Appends the current time to the entry's click history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the entry does not exist.
    pub async fn record_click(&self, url_type: &str, code: &str) -> Result<(), AppError> {
        let appended = self
            .repository
            .append_click(url_type, code, Utc::now())
            .await?;

        if !appended {
            return Err(not_found(url_type, code));
        }

        metrics::counter!("clicks_recorded_total").increment(1);
        Ok(())
    }

    /// Resolves a code for a redirect: looks it up, applies the expiry
    /// policy and records the click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the entry is missing, deleted
    /// concurrently, or expired while expiry is enforced.
    pub async fn resolve(&self, url_type: &str, code: &str) -> Result<Entry, AppError> {
        let entry = self.get(url_type, code).await?;

        if self.enforce_expiry && entry.is_expired() {
            debug!(url_type, code, "Refusing to resolve expired entry");
            return Err(AppError::not_found(
                format!("Short URL {code} has expired"),
                json!({ "type": url_type, "code": code, "expired": true }),
            ));
        }

        self.record_click(url_type, code).await?;
        Ok(entry)
    }

    /// Generates a free code in `url_type` and stores the entry under it.
    ///
    /// # Collision handling
    ///
    /// 1. For codespaces of at most [`EXHAUSTIVE_CLAIM_LIMIT`] codes, fails
    ///    fast if the namespace already fills it; larger namespaces are never
    ///    counted on the success path
    /// 2. Tries up to `max_attempts` random candidates, skipping codes that
    ///    exist and retrying when the conditional insert loses a race
    /// 3. For codespaces of at most [`EXHAUSTIVE_CLAIM_LIMIT`] codes,
    ///    enumerates the remaining free codes and claims one of them
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] if `url` is missing, blank or not
    /// an absolute URL; nothing touches the store in that case.
    /// Returns [`AppError::CodespaceExhausted`] if no free code is left.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn create(
        &self,
        url_type: &str,
        url: Option<&str>,
        name: Option<String>,
        expiry_date: Option<DateTime<Utc>>,
    ) -> Result<String, AppError> {
        let url = validate_target_url(url)?;

        let small_codespace = self
            .generator
            .codespace_size()
            .filter(|&size| size <= EXHAUSTIVE_CLAIM_LIMIT);
        if let Some(size) = small_codespace {
            let occupied = self.repository.count(url_type).await?;
            if u128::from(occupied) >= size {
                warn!(url_type, occupied, "Namespace codespace exhausted");
                return Err(self.exhausted(url_type, occupied));
            }
        }

        let mut new_entry = NewEntry {
            short_code: String::new(),
            url_type: url_type.to_string(),
            url,
            name,
            expiry_date,
        };

        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            if self.repository.exists(url_type, &candidate).await? {
                metrics::counter!("short_code_collisions_total").increment(1);
                debug!(url_type, attempt, "Short code collision");
                continue;
            }

            new_entry.short_code = candidate;
            if self.repository.insert_if_absent(&new_entry).await? {
                return Ok(self.created(new_entry));
            }

            metrics::counter!("short_code_collisions_total").increment(1);
            debug!(url_type, attempt, "Lost insert race for short code");
        }

        if small_codespace.is_some() {
            warn!(
                url_type,
                attempts = self.max_attempts,
                "Random attempts exhausted, enumerating free codes"
            );
            if let Some(code) = self.claim_free_code(&mut new_entry).await? {
                return Ok(code);
            }
        }

        let occupied = self.repository.count(url_type).await?;
        warn!(url_type, occupied, "No free short code found");
        Err(self.exhausted(url_type, occupied))
    }

    /// Removes the entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the entry does not exist.
    pub async fn delete(&self, url_type: &str, code: &str) -> Result<(), AppError> {
        if !self.repository.delete(url_type, code).await? {
            return Err(not_found(url_type, code));
        }

        info!(url_type, code, "Entry deleted");
        Ok(())
    }

    /// Distinct categories across every namespace.
    pub async fn list_categories(&self) -> Result<BTreeSet<String>, AppError> {
        Ok(self.repository.list_types().await?.into_iter().collect())
    }

    pub async fn store_healthy(&self) -> bool {
        self.repository.health_check().await
    }

    /// Enumerates the codespace, shuffles the free codes and claims the
    /// first one whose conditional insert succeeds.
    async fn claim_free_code(&self, new_entry: &mut NewEntry) -> Result<Option<String>, AppError> {
        let taken: HashSet<String> = self
            .repository
            .list_codes(&new_entry.url_type)
            .await?
            .into_iter()
            .collect();

        let size = self.generator.codespace_size().unwrap_or(0);
        let mut free: Vec<String> = (0..size)
            .filter_map(|index| self.generator.code_at(index))
            .filter(|code| !taken.contains(code))
            .collect();
        free.shuffle(&mut rand::rng());

        for code in free {
            new_entry.short_code = code;
            if self.repository.insert_if_absent(new_entry).await? {
                return Ok(Some(self.created(new_entry.clone())));
            }
        }

        Ok(None)
    }

    fn created(&self, new_entry: NewEntry) -> String {
        metrics::counter!("entries_created_total").increment(1);
        info!(
            url_type = %new_entry.url_type,
            code = %new_entry.short_code,
            "Entry created"
        );
        new_entry.short_code
    }

    fn exhausted(&self, url_type: &str, occupied: u64) -> AppError {
        AppError::codespace_exhausted(
            "No free short code left in this category",
            json!({
                "type": url_type,
                "occupied": occupied,
                "codespace": self.generator.codespace_size().map(|s| s.to_string()),
            }),
        )
    }
}

/// Checks that a target URL is present and absolute.
fn validate_target_url(url: Option<&str>) -> Result<String, AppError> {
    let url = url.map(str::trim).unwrap_or_default();

    if url.is_empty() {
        return Err(AppError::invalid_argument(
            "No URL was provided",
            json!({ "field": "url" }),
        ));
    }

    url::Url::parse(url).map_err(|e| {
        AppError::invalid_argument(
            "URL must be absolute",
            json!({ "field": "url", "reason": e.to_string() }),
        )
    })?;

    Ok(url.to_string())
}

fn not_found(url_type: &str, code: &str) -> AppError {
    AppError::not_found(
        format!("Short URL {code} doesn't exist"),
        json!({ "type": url_type, "code": code }),
    )
}
