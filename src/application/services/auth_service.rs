//! Management credential check.

use hmac::{Hmac, Mac};
use rand::Rng;
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Verifies the management API key supplied by callers.
///
/// The configured key is never compared directly. Both sides are MACed with
/// a per-process random key and the tags are compared with
/// [`Mac::verify_slice`], which runs in constant time.
pub struct AuthService {
    mac_key: [u8; 32],
    expected_tag: Vec<u8>,
}

impl AuthService {
    /// Creates the service for the configured API key.
    pub fn new(api_key: &str) -> Self {
        let mut mac_key = [0u8; 32];
        rand::rng().fill(&mut mac_key);

        let expected_tag = Self::mac(&mac_key, api_key).finalize().into_bytes().to_vec();

        Self {
            mac_key,
            expected_tag,
        }
    }

    fn mac(mac_key: &[u8], value: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(mac_key).expect("HMAC accepts any key length");
        mac.update(value.as_bytes());
        mac
    }

    /// Checks a caller-supplied key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if the key is missing or wrong.
    pub fn authenticate(&self, provided: Option<&str>) -> Result<(), AppError> {
        let Some(provided) = provided else {
            return Err(AppError::forbidden(
                "Wrong API key provided",
                json!({ "reason": "API key is missing" }),
            ));
        };

        Self::mac(&self.mac_key, provided)
            .verify_slice(&self.expected_tag)
            .map_err(|_| {
                AppError::forbidden(
                    "Wrong API key provided",
                    json!({ "reason": "API key does not match" }),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_success() {
        let service = AuthService::new("s3cret");
        assert!(service.authenticate(Some("s3cret")).is_ok());
    }

    #[test]
    fn test_authenticate_wrong_key() {
        let service = AuthService::new("s3cret");
        let result = service.authenticate(Some("guess"));

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[test]
    fn test_authenticate_missing_key() {
        let service = AuthService::new("s3cret");
        let result = service.authenticate(None);

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[test]
    fn test_authenticate_prefix_is_not_enough() {
        let service = AuthService::new("s3cret");
        assert!(service.authenticate(Some("s3cre")).is_err());
        assert!(service.authenticate(Some("s3cret ")).is_err());
    }

    #[test]
    fn test_mac_keys_differ_per_instance() {
        let a = AuthService::new("s3cret");
        let b = AuthService::new("s3cret");

        assert_ne!(a.expected_tag, b.expected_tag);
        assert!(a.authenticate(Some("s3cret")).is_ok());
        assert!(b.authenticate(Some("s3cret")).is_ok());
    }
}
