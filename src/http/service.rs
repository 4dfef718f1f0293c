//! Request gate handlers.
//!
//! The gate sits between inbound traffic and the application body: every
//! request is checked against the rate limiter before being served, and an
//! administrative route clears a subnet's counter on demand.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use tracing::{debug, warn};

use crate::error::SubnetgateError;
use crate::ratelimit::RateLimiter;

/// Header carrying the client address, set by the fronting proxy.
pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

/// Build the gate's router: an administrative reset route plus a default
/// handler that rate-limits everything else.
pub fn build_router(limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        .route("/reset", post(reset))
        .fallback(gate)
        .with_state(limiter)
}

/// Default handler: decide pass/reject for one inbound request.
///
/// Rejected requests never reach `increment`, so they do not consume budget.
async fn gate(State(limiter): State<Arc<RateLimiter>>, headers: HeaderMap) -> Response {
    let address = headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match limiter.is_limited(address) {
        Ok(true) => {
            debug!(address, "Request rejected, subnet over limit");
            return (StatusCode::TOO_MANY_REQUESTS, "Too Many Requests").into_response();
        }
        Ok(false) => {}
        Err(e) => return reject_invalid_address(address, e),
    }

    if let Err(e) = limiter.increment(address) {
        return reject_invalid_address(address, e);
    }

    (StatusCode::OK, "Hello, World!").into_response()
}

/// Administrative reset: the request body is the literal subnet key.
async fn reset(State(limiter): State<Arc<RateLimiter>>, body: String) -> Response {
    let subnet = body.trim();
    if subnet.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing subnet key").into_response();
    }

    limiter.reset(subnet);
    debug!(subnet, "Reset requested");

    Json(serde_json::json!({ "status": "reset", "subnet": subnet })).into_response()
}

fn reject_invalid_address(address: &str, error: SubnetgateError) -> Response {
    warn!(address, error = %error, "Rejecting request with unusable client address");
    (StatusCode::BAD_REQUEST, "Invalid client address").into_response()
}
