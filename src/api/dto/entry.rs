//! DTOs for the management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Entry;

/// Parameters of `POST /manage/{type}`, from a JSON body, a form body or the
/// query string.
///
/// `url` stays optional here so that a missing URL reaches the service and
/// is reported the same way as a blank one.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntryRequest {
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: Option<String>,

    #[validate(length(max = 255, message = "Name is too long"))]
    pub name: Option<String>,

    /// RFC 3339, or `YYYY-MM-DDTHH:MM:SS` read as UTC.
    pub expiry_date: Option<String>,
}

impl CreateEntryRequest {
    /// Fills fields missing here from `fallback`, field by field.
    pub fn or(self, fallback: CreateEntryRequest) -> Self {
        Self {
            url: self.url.or(fallback.url),
            name: self.name.or(fallback.name),
            expiry_date: self.expiry_date.or(fallback.expiry_date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateEntryResponse {
    pub short_code: String,
    #[serde(rename = "type")]
    pub url_type: String,
}

/// JSON representation of a stored entry.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub short_code: String,
    #[serde(rename = "type")]
    pub url_type: String,
    pub url: String,
    pub name: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub expired: bool,
    pub clicks: usize,
    pub click_dates: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            expired: entry.is_expired(),
            clicks: entry.click_count(),
            short_code: entry.short_code,
            url_type: entry.url_type,
            url: entry.url,
            name: entry.name,
            expiry_date: entry.expiry_date,
            click_dates: entry.click_dates,
            created_at: entry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_entry_response_uses_type_key() {
        let now = Utc::now();
        let entry = Entry {
            short_code: "abc123".to_string(),
            url_type: "blog".to_string(),
            url: "https://example.com".to_string(),
            name: Some("Example".to_string()),
            expiry_date: Some(now - Duration::hours(1)),
            click_dates: vec![now, now],
            created_at: now,
        };

        let json = serde_json::to_value(EntryResponse::from(entry)).unwrap();

        assert_eq!(json["type"], "blog");
        assert_eq!(json["short_code"], "abc123");
        assert_eq!(json["clicks"], 2);
        assert_eq!(json["expired"], true);
        assert!(json.get("url_type").is_none());
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateEntryRequest {
            url: Some(format!("https://example.com/{}", "a".repeat(2100))),
            name: None,
            expiry_date: None,
        };
        assert!(request.validate().is_err());

        let request = CreateEntryRequest {
            url: None,
            name: Some("ok".to_string()),
            expiry_date: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_body_fields_win_over_fallback() {
        let body = CreateEntryRequest {
            url: Some("https://example.com/body".to_string()),
            name: None,
            expiry_date: None,
        };
        let query = CreateEntryRequest {
            url: Some("https://example.com/query".to_string()),
            name: Some("From query".to_string()),
            expiry_date: None,
        };

        let merged = body.or(query);

        assert_eq!(merged.url.as_deref(), Some("https://example.com/body"));
        assert_eq!(merged.name.as_deref(), Some("From query"));
        assert!(merged.expiry_date.is_none());
    }
}
