//! In-process entry repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use std::collections::BTreeSet;
use tracing::debug;

use crate::domain::entities::{Entry, NewEntry};
use crate::domain::repositories::EntryRepository;
use crate::error::AppError;

/// `(url_type, short_code)`
type EntryKey = (String, String);

/// Entry store held in a sharded concurrent map.
///
/// Used with `STORE_BACKEND=memory` and by the integration tests. Contents
/// are lost when the process exits.
///
/// The conditional insert goes through [`DashMap::entry`] and click appends
/// through [`DashMap::get_mut`]; both hold the shard lock for the duration of
/// the write, so neither can interleave with another writer on the same key.
pub struct MemoryEntryRepository {
    entries: DashMap<EntryKey, Entry>,
}

impl MemoryEntryRepository {
    pub fn new() -> Self {
        debug!("Using in-memory entry store");
        Self {
            entries: DashMap::new(),
        }
    }

    fn key(url_type: &str, code: &str) -> EntryKey {
        (url_type.to_string(), code.to_string())
    }
}

impl Default for MemoryEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryRepository for MemoryEntryRepository {
    async fn insert_if_absent(&self, new_entry: &NewEntry) -> Result<bool, AppError> {
        match self
            .entries
            .entry(Self::key(&new_entry.url_type, &new_entry.short_code))
        {
            MapEntry::Occupied(_) => Ok(false),
            MapEntry::Vacant(slot) => {
                slot.insert(new_entry.clone().into_entry(Utc::now()));
                Ok(true)
            }
        }
    }

    async fn find_by_code(&self, url_type: &str, code: &str) -> Result<Option<Entry>, AppError> {
        Ok(self
            .entries
            .get(&Self::key(url_type, code))
            .map(|e| e.value().clone()))
    }

    async fn exists(&self, url_type: &str, code: &str) -> Result<bool, AppError> {
        Ok(self.entries.contains_key(&Self::key(url_type, code)))
    }

    async fn list(&self, url_type: &str) -> Result<Vec<Entry>, AppError> {
        let mut entries: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| e.key().0 == url_type)
            .map(|e| e.value().clone())
            .collect();

        entries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.short_code.cmp(&b.short_code))
        });

        Ok(entries)
    }

    async fn list_codes(&self, url_type: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.key().0 == url_type)
            .map(|e| e.key().1.clone())
            .collect())
    }

    async fn count(&self, url_type: &str) -> Result<u64, AppError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.key().0 == url_type)
            .count() as u64)
    }

    async fn delete(&self, url_type: &str, code: &str) -> Result<bool, AppError> {
        Ok(self.entries.remove(&Self::key(url_type, code)).is_some())
    }

    async fn append_click(
        &self,
        url_type: &str,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        match self.entries.get_mut(&Self::key(url_type, code)) {
            Some(mut entry) => {
                entry.click_dates.push(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_types(&self) -> Result<Vec<String>, AppError> {
        let types: BTreeSet<String> = self.entries.iter().map(|e| e.key().0.clone()).collect();
        Ok(types.into_iter().collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_entry(url_type: &str, code: &str) -> NewEntry {
        NewEntry {
            short_code: code.to_string(),
            url_type: url_type.to_string(),
            url: format!("https://example.com/{code}"),
            name: None,
            expiry_date: None,
        }
    }

    #[tokio::test]
    async fn test_insert_if_absent_rejects_duplicate() {
        let repo = MemoryEntryRepository::new();

        assert!(repo.insert_if_absent(&new_entry("blog", "abc")).await.unwrap());
        assert!(!repo.insert_if_absent(&new_entry("blog", "abc")).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_code_allowed_in_other_namespace() {
        let repo = MemoryEntryRepository::new();

        assert!(repo.insert_if_absent(&new_entry("blog", "abc")).await.unwrap());
        assert!(repo.insert_if_absent(&new_entry("news", "abc")).await.unwrap());
        assert_eq!(repo.count("blog").await.unwrap(), 1);
        assert_eq!(repo.count("news").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_append_click_missing_entry() {
        let repo = MemoryEntryRepository::new();
        assert!(!repo.append_click("blog", "nope", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_append_click_keeps_order() {
        let repo = MemoryEntryRepository::new();
        repo.insert_if_absent(&new_entry("blog", "abc")).await.unwrap();

        let first = Utc::now();
        let second = first + chrono::Duration::seconds(1);
        repo.append_click("blog", "abc", first).await.unwrap();
        repo.append_click("blog", "abc", second).await.unwrap();

        let entry = repo.find_by_code("blog", "abc").await.unwrap().unwrap();
        assert_eq!(entry.click_dates, vec![first, second]);
    }

    #[tokio::test]
    async fn test_list_scoped_to_namespace() {
        let repo = MemoryEntryRepository::new();
        repo.insert_if_absent(&new_entry("blog", "a1")).await.unwrap();
        repo.insert_if_absent(&new_entry("blog", "a2")).await.unwrap();
        repo.insert_if_absent(&new_entry("news", "b1")).await.unwrap();

        let blog = repo.list("blog").await.unwrap();
        assert_eq!(blog.len(), 2);
        assert!(blog.iter().all(|e| e.url_type == "blog"));

        let mut codes = repo.list_codes("news").await.unwrap();
        codes.sort();
        assert_eq!(codes, vec!["b1"]);
    }

    #[tokio::test]
    async fn test_list_types_distinct_and_sorted() {
        let repo = MemoryEntryRepository::new();
        repo.insert_if_absent(&new_entry("news", "a")).await.unwrap();
        repo.insert_if_absent(&new_entry("blog", "b")).await.unwrap();
        repo.insert_if_absent(&new_entry("news", "c")).await.unwrap();

        assert_eq!(repo.list_types().await.unwrap(), vec!["blog", "news"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = MemoryEntryRepository::new();
        repo.insert_if_absent(&new_entry("blog", "abc")).await.unwrap();

        assert!(repo.delete("blog", "abc").await.unwrap());
        assert!(!repo.delete("blog", "abc").await.unwrap());
        assert!(!repo.exists("blog", "abc").await.unwrap());
    }
}
