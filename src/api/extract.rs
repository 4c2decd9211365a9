//! Request extractors shared by the management handlers.

use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, Query, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::json;

use crate::api::dto::entry::CreateEntryRequest;
use crate::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Create parameters gathered from the body and the query string.
///
/// The body is read as a form when the content type says so and as JSON
/// otherwise. An empty body is allowed. Body fields take precedence over
/// query fields of the same name; unknown query keys such as `api_key` are
/// ignored. Every rejection becomes [`AppError::InvalidArgument`].
#[derive(Debug)]
pub struct CreateEntryParams(pub CreateEntryRequest);

impl<S> FromRequest<S> for CreateEntryParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<CreateEntryRequest>::try_from_uri(req.uri())
            .map_err(|e| malformed("query string", e.body_text()))?;

        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

        let body = if is_form {
            let Form(body) = Form::<CreateEntryRequest>::from_request(req, state)
                .await
                .map_err(|e| malformed("form body", e.body_text()))?;
            Some(body)
        } else {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| malformed("body", e.body_text()))?;

            if bytes.iter().all(u8::is_ascii_whitespace) {
                None
            } else {
                let Json(body) = Json::<CreateEntryRequest>::from_bytes(&bytes)
                    .map_err(|e| malformed("JSON body", e.body_text()))?;
                Some(body)
            }
        };

        Ok(Self(match body {
            Some(body) => body.or(query),
            None => query,
        }))
    }
}

fn malformed(source: &str, reason: String) -> AppError {
    AppError::invalid_argument(
        format!("Malformed {}", source),
        json!({ "reason": reason }),
    )
}
