//! Handlers for entry management endpoints (list, create, get, delete).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::entry::{CreateEntryResponse, EntryResponse};
use crate::api::extract::CreateEntryParams;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::datetime::parse_timestamp;

/// Lists every entry of a category, including expired ones.
///
/// # Endpoint
///
/// `GET /manage/{type}`
pub async fn list_entries_handler(
    Path(url_type): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<EntryResponse>>, AppError> {
    let entries = state.shortener.get_all(&url_type).await?;
    Ok(Json(entries.into_iter().map(EntryResponse::from).collect()))
}

/// Creates an entry under a freshly generated code.
///
/// # Endpoint
///
/// `POST /manage/{type}`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/article",
///   "name": "Launch post",                  // optional
///   "expiry_date": "2026-12-31T23:59:59"    // optional, UTC
/// }
/// ```
///
/// The same fields are accepted as a form body or in the query string
/// (`?url=...&name=...`). A body field wins over a query field.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "short_code": "aB3xY9", "type": "blog" }
/// ```
///
/// # Errors
///
/// - 422 if the URL is missing, blank or not absolute, the expiry date does
///   not parse, or the body is malformed
/// - 500 if the category has no free code left
pub async fn create_entry_handler(
    Path(url_type): Path<String>,
    State(state): State<AppState>,
    CreateEntryParams(payload): CreateEntryParams,
) -> Result<(StatusCode, Json<CreateEntryResponse>), AppError> {
    payload.validate()?;

    let expiry_date = payload
        .expiry_date
        .as_deref()
        .map(|raw| parse_timestamp("expiry_date", raw))
        .transpose()?;

    let short_code = state
        .shortener
        .create(&url_type, payload.url.as_deref(), payload.name, expiry_date)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateEntryResponse {
            short_code,
            url_type,
        }),
    ))
}

/// Returns one entry without recording a click.
///
/// # Endpoint
///
/// `GET /manage/{type}/{short_code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist in the category.
pub async fn get_entry_handler(
    Path((url_type, code)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<EntryResponse>, AppError> {
    let entry = state.shortener.get(&url_type, &code).await?;
    Ok(Json(entry.into()))
}

/// Removes an entry.
///
/// # Endpoint
///
/// `DELETE /manage/{type}/{short_code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist in the category.
pub async fn delete_entry_handler(
    Path((url_type, code)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if !state.shortener.exists(&url_type, &code).await? {
        return Err(AppError::not_found(
            format!("Short URL {code} doesn't exist"),
            serde_json::json!({ "type": url_type, "code": code }),
        ));
    }

    state.shortener.delete(&url_type, &code).await?;

    Ok(StatusCode::NO_CONTENT)
}
