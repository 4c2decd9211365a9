//! API key authentication middleware.

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde::Deserialize;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

/// Authenticates management requests against the configured API key.
///
/// # Credential Sources
///
/// ```text
/// Authorization: Bearer <key>
/// GET /manage/blog?api_key=<key>
/// ```
///
/// The header wins when both are present.
///
/// # Errors
///
/// Returns `403 Forbidden` if the key is missing or does not match.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/manage/{type}", get(list_entries_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let provided = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => Some(token),
        Err(_) => Query::<ApiKeyQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.api_key),
    };

    st.auth.authenticate(provided.as_deref()).inspect_err(|_| {
        tracing::debug!(path = %parts.uri.path(), "Rejected management request");
    })?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
