//! Handler for category listing.

use axum::{Json, extract::State};

use crate::error::AppError;
use crate::state::AppState;

/// Lists every category that holds at least one entry.
///
/// # Endpoint
///
/// `GET /manage/categories`
///
/// # Response
///
/// ```json
/// ["blog", "news"]
/// ```
pub async fn categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let categories = state.shortener.list_categories().await?;
    Ok(Json(categories.into_iter().collect()))
}
