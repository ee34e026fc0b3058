//! Error types for handlers.
//!
//! A handler that fails returns a [`HandlerError`]. The error stops the
//! chain at that handler and travels back out of [`Context::next`] to the
//! dispatcher, which renders it as a JSON error envelope unless the chain
//! already wrote a response.
//!
//! [`Context::next`]: crate::Context::next

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::RequestId;
use crate::types::{Response, ResponseExt};

/// Categories of handler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or invalid request.
    BadRequest,
    /// Missing or invalid credentials.
    Unauthorized,
    /// Permission denied.
    Forbidden,
    /// Resource not found.
    NotFound,
    /// The handler ran out of time.
    Timeout,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Timeout => "TIMEOUT",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Error returned by a handler to stop the chain.
///
/// # Example
///
/// ```
/// use waypoint_core::{ErrorKind, HandlerError};
///
/// fn require_token(token: Option<&str>) -> Result<(), HandlerError> {
///     token.map(|_| ()).ok_or_else(|| HandlerError::unauthorized("missing token"))
/// }
///
/// let err = require_token(None).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Unauthorized);
/// ```
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The request is malformed.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Human-readable error message.
        message: String,
    },

    /// Authentication failed.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message.
        message: String,
    },

    /// Authorization denied.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// Handler timeout.
    #[error("Timeout: {message}")]
    Timeout {
        /// Human-readable error message.
        message: String,
    },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A handler built an invalid response.
    #[error("Invalid response: {0}")]
    Http(#[from] http::Error),
}

impl HandlerError {
    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Internal { .. } | Self::Http(_) => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Message safe to show to clients. Internal details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Timeout { message }
            | Self::Internal { message, .. } => message.clone(),
            Self::Http(_) => "internal server error".to_string(),
        }
    }

    /// Renders the error as a JSON envelope response.
    ///
    /// ```json
    /// {"error": {"code": "NOT_FOUND", "message": "..."}, "request_id": "..."}
    /// ```
    #[must_use]
    pub fn into_response(self, request_id: Option<&RequestId>) -> Response {
        let kind = self.kind();
        let mut body = serde_json::json!({
            "error": {
                "code": kind.as_str(),
                "message": self.public_message(),
            }
        });
        if let Some(id) = request_id {
            body["request_id"] = serde_json::Value::String(id.to_string());
        }
        Response::with_body(kind.status_code(), "application/json", body.to_string())
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::error::Error as _;

    #[test]
    fn test_kinds_map_to_status_codes() {
        let cases = [
            (HandlerError::bad_request("x"), StatusCode::BAD_REQUEST),
            (HandlerError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (HandlerError::forbidden("x"), StatusCode::FORBIDDEN),
            (HandlerError::not_found("x"), StatusCode::NOT_FOUND),
            (HandlerError::timeout("x"), StatusCode::GATEWAY_TIMEOUT),
            (HandlerError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{error}");
        }
    }

    #[test]
    fn test_internal_with_source_keeps_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let error = HandlerError::internal_with_source("could not save", io);

        assert_eq!(error.kind(), ErrorKind::Internal);
        assert!(error.source().is_some());
        assert_eq!(error.public_message(), "could not save");
    }

    #[test]
    fn test_from_anyhow() {
        let error: HandlerError = anyhow::anyhow!("boom").into();
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert!(error.to_string().contains("boom"));
    }

    #[test]
    fn test_into_response_envelope() {
        let id = RequestId::new();
        let response = HandlerError::forbidden("admins only").into_response(Some(&id));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = tokio_test::block_on(response.into_body().collect())
            .unwrap()
            .to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "FORBIDDEN");
        assert_eq!(json["error"]["message"], "admins only");
        assert_eq!(json["request_id"], id.to_string());
    }

    #[test]
    fn test_into_response_without_request_id() {
        let response = HandlerError::internal("oops").into_response(None);
        let bytes = tokio_test::block_on(response.into_body().collect())
            .unwrap()
            .to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json.get("request_id").is_none());
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }
}
