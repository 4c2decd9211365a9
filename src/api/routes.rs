//! Management route configuration.
//!
//! All routes here require the API key via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    categories_handler, create_entry_handler, delete_entry_handler, get_entry_handler,
    list_entries_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Management routes, mounted under `/manage`.
///
/// # Endpoints
///
/// - `GET    /categories`           - Distinct categories
/// - `GET    /{type}`               - All entries of a category
/// - `POST   /{type}`               - Create an entry with a generated code
/// - `GET    /{type}/{short_code}`  - One entry, no click recorded
/// - `DELETE /{type}/{short_code}`  - Remove an entry
///
/// `categories` is matched before `{type}`, so a category with that name
/// can still be resolved but not managed over HTTP.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories_handler))
        .route(
            "/{type}",
            get(list_entries_handler).post(create_entry_handler),
        )
        .route(
            "/{type}/{short_code}",
            get(get_entry_handler).delete(delete_entry_handler),
        )
}
