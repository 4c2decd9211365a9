//! Entry entity: one short code inside one category namespace.

use chrono::{DateTime, Utc};

/// A stored short code with its target and usage history.
///
/// `(url_type, short_code)` identifies the entry. Codes are unique only
/// within their `url_type`; the empty type is the global namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub short_code: String,
    pub url_type: String,
    pub url: String,
    pub name: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    /// Append-only; one timestamp per successful redirect.
    pub click_dates: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Returns true if the entry has an expiry date at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|e| now >= e)
    }

    /// Returns true if the entry has passed its expiry date.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn click_count(&self) -> usize {
        self.click_dates.len()
    }
}

/// Input data for inserting a new entry.
///
/// The click history of a new entry is always empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub short_code: String,
    pub url_type: String,
    pub url: String,
    pub name: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl NewEntry {
    /// Materializes the entry as a store would after inserting it.
    pub fn into_entry(self, created_at: DateTime<Utc>) -> Entry {
        Entry {
            short_code: self.short_code,
            url_type: self.url_type,
            url: self.url,
            name: self.name,
            expiry_date: self.expiry_date,
            click_dates: Vec::new(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_entry(expiry_date: Option<DateTime<Utc>>) -> NewEntry {
        NewEntry {
            short_code: "abc123".to_string(),
            url_type: "blog".to_string(),
            url: "https://example.com".to_string(),
            name: Some("Example".to_string()),
            expiry_date,
        }
    }

    #[test]
    fn test_into_entry_starts_without_clicks() {
        let now = Utc::now();
        let entry = new_entry(None).into_entry(now);

        assert_eq!(entry.short_code, "abc123");
        assert_eq!(entry.url_type, "blog");
        assert_eq!(entry.url, "https://example.com");
        assert_eq!(entry.name.as_deref(), Some("Example"));
        assert_eq!(entry.created_at, now);
        assert!(entry.click_dates.is_empty());
        assert_eq!(entry.click_count(), 0);
    }

    #[test]
    fn test_entry_without_expiry_never_expires() {
        let entry = new_entry(None).into_entry(Utc::now());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_with_past_expiry_is_expired() {
        let entry = new_entry(Some(Utc::now() - Duration::seconds(1))).into_entry(Utc::now());
        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_with_future_expiry_is_live() {
        let entry = new_entry(Some(Utc::now() + Duration::hours(1))).into_entry(Utc::now());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let at = Utc::now();
        let entry = new_entry(Some(at)).into_entry(at);
        assert!(entry.is_expired_at(at));
        assert!(!entry.is_expired_at(at - Duration::milliseconds(1)));
    }
}
