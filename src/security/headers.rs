//! Response headers for rendered pages.

use axum::http::{
    header::{InvalidHeaderValue, CONTENT_SECURITY_POLICY, CONTENT_TYPE},
    HeaderMap, HeaderValue,
};

/// Content type of every rendered page.
pub const PAGE_CONTENT_TYPE: &str = "text/html";

/// Set `Content-Type` and `Content-Security-Policy`, replacing existing values.
///
/// `Content-Type` is always set; the CSP is left out if `csp` is not a valid
/// header value.
pub fn apply_page_headers(headers: &mut HeaderMap, csp: &str) -> Result<(), InvalidHeaderValue> {
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(PAGE_CONTENT_TYPE));
    headers.remove(CONTENT_SECURITY_POLICY);
    headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_str(csp)?);
    Ok(())
}
