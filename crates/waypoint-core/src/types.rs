//! HTTP request and response types used by handlers.

use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type seen by handlers.
///
/// This is a standard `http::Request` with a fully buffered body.
pub type Request = http::Request<Bytes>;

/// The HTTP response type produced by handlers.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building simple responses.
pub trait ResponseExt {
    /// Creates a response with the given status, content type and body.
    fn with_body(status: http::StatusCode, content_type: &str, body: impl Into<Bytes>) -> Response;

    /// Creates a plain-text response.
    fn text(status: http::StatusCode, body: impl Into<String>) -> Response;

    /// Creates a JSON error response.
    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn with_body(status: http::StatusCode, content_type: &str, body: impl Into<Bytes>) -> Response {
        let mut response = http::Response::new(Full::new(body.into()));
        *response.status_mut() = status;
        if let Ok(value) = http::HeaderValue::from_str(content_type) {
            response
                .headers_mut()
                .insert(http::header::CONTENT_TYPE, value);
        }
        response
    }

    fn text(status: http::StatusCode, body: impl Into<String>) -> Response {
        let body: String = body.into();
        Self::with_body(status, "text/plain; charset=utf-8", body)
    }

    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });

        Self::with_body(status, "application/json", body.to_string())
    }
}
