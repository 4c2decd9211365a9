//! Per-client throttling of the management API.

use axum::{
    Json,
    body::Body,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use serde_json::json;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder,
    key_extractor::PeerIpKeyExtractor,
};
use tracing::warn;

/// Sustained management requests per second and client address.
pub const MANAGE_PER_SECOND: u64 = 2;

/// Requests a client may send in a burst before throttling starts.
pub const MANAGE_BURST: u32 = 50;

pub type ManageRateLimit = GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, Body>;

/// Limits `/manage` traffic per peer IP.
///
/// Throttled requests get `429` in the usual `{"error": ...}` envelope with
/// code `rate_limited` and a `Retry-After` header. Needs the server to run
/// with `into_make_service_with_connect_info::<SocketAddr>()`. The public
/// redirect route is not limited.
pub fn manage_layer() -> ManageRateLimit {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(MANAGE_PER_SECOND)
            .burst_size(MANAGE_BURST)
            .finish()
            .expect("management quota is non-zero"),
    );

    GovernorLayer::new(governor_conf).error_handler(rejection_response)
}

fn rejection_response(error: GovernorError) -> Response {
    match error {
        GovernorError::TooManyRequests { wait_time, .. } => {
            warn!(retry_after_secs = wait_time, "Management rate limit exceeded");

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": {
                        "code": "rate_limited",
                        "message": "Too many management requests",
                        "details": { "retry_after_secs": wait_time },
                    }
                })),
            )
                .into_response();
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(wait_time));
            response
        }
        other => {
            warn!(error = %other, "Rate limiter rejected request");
            Response::from(other)
        }
    }
}
