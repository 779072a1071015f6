//! Request identification and URL reconstruction.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing, and echoed back
//! - An incoming `x-request-id` is kept rather than replaced
//! - The page URL is rebuilt from `Host` and `X-Forwarded-Proto`

use axum::http::{
    header::HOST,
    request::Parts,
    HeaderMap, HeaderName, HeaderValue, Request,
};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use url::Url;
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Layer that assigns an `x-request-id` to requests missing one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// The request id header, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Absolute URL of the requested page.
pub fn request_url(parts: &Parts) -> Result<Url, url::ParseError> {
    let host = parts
        .headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| parts.uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    let forwarded_https = parts
        .headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case("https"))
        .unwrap_or(false);
    let scheme = if forwarded_https {
        "https"
    } else {
        parts.uri.scheme_str().unwrap_or("http")
    };

    let path = parts
        .uri
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or("/");

    Url::parse(&format!("{scheme}://{host}{path}"))
}
