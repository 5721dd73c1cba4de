//! Errors that end a relay request before an outcome is produced.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Terminal failures of the relay handler.
///
/// Transport and upstream failures are not errors here; they are reported
/// inside a successful response as a [`RelayOutcome`](super::RelayOutcome).
#[derive(Debug, Error)]
pub enum RelayError {
    /// Request method is neither POST nor the OPTIONS preflight.
    #[error("Method not allowed. Use POST.")]
    MethodNotAllowed,

    /// Body is not JSON or decodes to an empty/falsy value.
    #[error("Invalid JSON input")]
    InvalidInput,

    /// A required payload field is absent (or null).
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Anything that went wrong while processing a well-formed request.
    #[error("Exception: {message}")]
    Internal { message: String, trace: String },
}

impl RelayError {
    /// Build an internal error, capturing the error and its source chain as the trace.
    pub fn internal(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut trace = Vec::new();
        let mut current = Some(err);
        while let Some(cause) = current {
            trace.push(format!("#{} {}", trace.len(), cause));
            current = cause.source();
        }
        Self::Internal {
            message: err.to_string(),
            trace: trace.join("\n"),
        }
    }

    /// HTTP status the caller receives for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidInput | RelayError::MissingField(_) => StatusCode::BAD_REQUEST,
            RelayError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MethodNotAllowed => "method_not_allowed",
            RelayError::InvalidInput => "invalid_input",
            RelayError::MissingField(_) => "missing_field",
            RelayError::Internal { .. } => "internal",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            RelayError::Internal { trace, .. } => json!({
                "success": false,
                "error": self.to_string(),
                "trace": trace,
            }),
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Payload field that cannot be coerced into the shape the relay needs.
#[derive(Debug, Error)]
#[error("field `{field}` {problem}")]
pub struct FieldTypeError {
    pub field: &'static str,
    pub problem: &'static str,
}
