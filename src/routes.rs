//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{type}/{short_code}` - Redirect (public)
//! - `GET  /health`              - Store liveness (public)
//! - `/manage/*`                 - Management API (API key required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on management routes
//! - **Authentication** - Bearer header or `api_key` query parameter
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with every route and middleware except path
/// normalization.
pub fn router(state: AppState) -> Router {
    let manage_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::manage_layer());

    Router::new()
        .route("/health", get(health_handler))
        .route("/{type}/{short_code}", get(redirect_handler))
        .nest("/manage", manage_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service with trailing slashes trimmed before
/// routing.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
