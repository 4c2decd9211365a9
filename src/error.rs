//! Application error type shared by every layer.
//!
//! Each variant maps to one failure kind of the shortener and to one HTTP
//! status. Variants carry a human-readable message plus a JSON `details`
//! value that is returned verbatim to API clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad alphabet, code length or other startup setting.
    #[error("{message}")]
    InvalidConfiguration { message: String, details: Value },

    /// A required field is missing or malformed.
    #[error("{message}")]
    InvalidArgument { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Management credential missing or wrong.
    #[error("{message}")]
    Forbidden { message: String, details: Value },

    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    /// No free short code is left in the namespace.
    #[error("{message}")]
    CodespaceExhausted { message: String, details: Value },
}

impl AppError {
    pub fn invalid_configuration(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_argument(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }
    pub fn codespace_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::CodespaceExhausted {
            message: message.into(),
            details,
        }
    }

    /// HTTP status and stable machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidConfiguration { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_configuration",
            ),
            AppError::InvalidArgument { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_argument")
            }
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::StoreUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            AppError::CodespaceExhausted { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "codespace_exhausted")
            }
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let (message, details) = match self {
            AppError::InvalidConfiguration { message, details }
            | AppError::InvalidArgument { message, details }
            | AppError::NotFound { message, details }
            | AppError::Forbidden { message, details }
            | AppError::StoreUnavailable { message, details }
            | AppError::CodespaceExhausted { message, details } => {
                (message.clone(), details.clone())
            }
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Store operation failed");
        AppError::store_unavailable("Entry store unavailable", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = e
            .field_errors()
            .into_keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort();
        AppError::invalid_argument("Request validation failed", json!({ "fields": fields }))
    }
}
