//! Error taxonomy for the recognition pipeline
//!
//! Every failure in the pipeline is a `PlateError` value: a kind from a
//! closed catalog plus an optional per-instance message override. The
//! override replaces the default message but never the status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Closed catalog of pipeline failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required request field absent (400)
    FieldMissing,
    /// Recognition engine rejected the image (400)
    InvalidImage,
    /// Image store has no image for the identifier (404)
    ImageNotFound,
    /// Image store failed or is unreachable (424)
    ImageServiceUnavailable,
    /// Image store rejected our request (500)
    ImageServiceAccessInvalid,
    /// Identifier is not a natural number in decimal form (400)
    InvalidImageId,
    /// Inline payload is not byte image data (415)
    ImageNotBytes,
    /// Result assembly found mismatched key/value counts (500)
    ResultSizeMismatch,
    /// Anything the catalog does not name (500)
    Unknown,
}

impl ErrorKind {
    /// Default human-readable message for this kind
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::FieldMissing => "field not found",
            ErrorKind::InvalidImage => "invalid image",
            ErrorKind::ImageNotFound => "image not found",
            ErrorKind::ImageServiceUnavailable => "service with images unavailable",
            ErrorKind::ImageServiceAccessInvalid => {
                "invalid access to the service with images"
            }
            ErrorKind::InvalidImageId => "invalid image id",
            ErrorKind::ImageNotBytes => "image not in byte format",
            ErrorKind::ResultSizeMismatch => "invalid number of parameters of returned json",
            ErrorKind::Unknown => "unknown error",
        }
    }

    /// HTTP status mapped to this kind (never overridden per instance)
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::FieldMissing | ErrorKind::InvalidImage | ErrorKind::InvalidImageId => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::ImageNotFound => StatusCode::NOT_FOUND,
            ErrorKind::ImageNotBytes => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::ImageServiceUnavailable => StatusCode::FAILED_DEPENDENCY,
            ErrorKind::ImageServiceAccessInvalid
            | ErrorKind::ResultSizeMismatch
            | ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a legacy numeric catalog code (0..=8) to a kind
    ///
    /// Unrecognized codes collapse to `Unknown`; the catalog is total.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ErrorKind::FieldMissing,
            1 => ErrorKind::InvalidImage,
            2 => ErrorKind::ImageNotFound,
            3 => ErrorKind::ImageServiceUnavailable,
            4 => ErrorKind::ImageServiceAccessInvalid,
            5 => ErrorKind::InvalidImageId,
            6 => ErrorKind::ImageNotBytes,
            7 => ErrorKind::ResultSizeMismatch,
            _ => ErrorKind::Unknown,
        }
    }
}

/// A recognition-pipeline failure
///
/// Immutable once constructed; lives only for the duration of one request.
/// Propagated unchanged up the call chain until it becomes a wire response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.message())]
pub struct PlateError {
    kind: ErrorKind,
    message: Option<String>,
}

impl PlateError {
    /// Construct with the kind's default message
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Construct with a per-instance message override
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The override if one was given, otherwise the kind's default message
    pub fn message(&self) -> &str {
        match &self.message {
            Some(message) => message,
            None => self.kind.default_message(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl IntoResponse for PlateError {
    /// Convert to the `{"error": <message>}` wire shape
    ///
    /// This is the assembly boundary: every error that reaches the caller
    /// passes through here, so it is logged exactly once.
    fn into_response(self) -> Response {
        tracing::error!("{}", self.message());
        let body = Json(json!({ "error": self.message() }));
        (self.status(), body).into_response()
    }
}
