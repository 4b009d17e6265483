//! Error types shared by the dispatcher, handlers and serializers
//!
//! Every failure is eventually flattened into the same error envelope
//! (`Message` + `Status`), but keeps its own HTTP status on the way out.

use hyper::StatusCode;
use thiserror::Error;

/// Message returned when no handler matches (method, resource, shape)
pub const MATCHING_RESOURCE_NOT_FOUND: &str = "No resource found matching the given request.";

/// Message returned for requests addressed at the API root
pub const SCHEMA_NOT_IMPLEMENTED: &str = "Support for generating schemas is not yet implemented.";

/// Message returned when a handler panics
pub const HANDLER_PANICKED: &str = "Internal server error.";

/// Error reported by a resource handler
///
/// The message is surfaced verbatim to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ResourceError {
    status: StatusCode,
    message: String,
}

impl ResourceError {
    /// Handler failure answered with 500 Internal Server Error
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CONFLICT, message)
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure while turning a response document into bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode {content_type} response: {reason}")]
pub struct EncodeError {
    pub content_type: String,
    pub reason: String,
}

impl EncodeError {
    pub fn new(content_type: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            content_type: content_type.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the dispatcher can answer with instead of a handler result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{}", MATCHING_RESOURCE_NOT_FOUND)]
    NoResource,
    #[error("{}", SCHEMA_NOT_IMPLEMENTED)]
    SchemaNotImplemented,
    #[error(transparent)]
    Handler(#[from] ResourceError),
    #[error(transparent)]
    Encoding(#[from] EncodeError),
    #[error("{}", HANDLER_PANICKED)]
    HandlerPanicked,
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NoResource => StatusCode::NOT_FOUND,
            Self::SchemaNotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::Handler(err) => err.status(),
            Self::Encoding(_) | Self::HandlerPanicked => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
