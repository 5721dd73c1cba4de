//! Response headers shared by every relay response.
//!
//! # Responsibilities
//! - Force `Content-Type: application/json`, including on empty preflight replies
//! - Add the permissive CORS headers browsers need to call the relay
//!
//! # Design Decisions
//! - Headers are set by a layer so error paths and rejections carry them too
//! - Values override anything a handler set

use axum::{
    http::{header, HeaderName, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Fixed headers attached to every response.
pub const RELAY_HEADERS: [(HeaderName, &str); 4] = [
    (header::CONTENT_TYPE, "application/json"),
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, GET, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// Wrap a router so every response carries [`RELAY_HEADERS`].
pub fn with_relay_headers(router: Router) -> Router {
    RELAY_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(
                name,
                HeaderValue::from_static(value),
            ))
        })
}
