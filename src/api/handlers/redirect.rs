//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL and records the click.
///
/// # Endpoint
///
/// `GET /{type}/{short_code}`
///
/// # Response
///
/// `302 Found` with the target in `Location`. The click is recorded before
/// the response is sent.
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist in the category, or if
/// it has expired while expiry is enforced.
pub async fn redirect_handler(
    Path((url_type, code)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.shortener.resolve(&url_type, &code).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, entry.url)]))
}
