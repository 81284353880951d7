//! Response envelopes.
//!
//! Every body carries a top-level `success` flag. Successful payloads are
//! flattened next to it (`{ "success": true, "task": {...} }`); failures use
//! [`ErrorBody`].

use serde::Serialize;

/// Message returned for every 500, whatever the underlying cause.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";
pub const INTERNAL_ERROR_CODE: &str = "INTERNAL_ERROR";

/// `{ "success": true, ...body }` envelope.
///
/// `T` must serialize as a map (a struct with named fields).
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// `{ "success": false, "message", "errors", "code" }` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub errors: Vec<FieldError>,
    pub code: &'static str,
    /// Internal diagnostic; only populated outside production mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// The sanitized 500 body, optionally carrying the diagnostic.
    pub fn internal(detail: Option<String>) -> Self {
        Self {
            success: false,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            errors: Vec::new(),
            code: INTERNAL_ERROR_CODE,
            detail,
        }
    }
}

/// `{ "message": ... }` payload for operations with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}
