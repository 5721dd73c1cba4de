//! Mapping of the outbound attempt to the JSON response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Number of payload characters echoed back to the caller.
pub const PREVIEW_CHARS: usize = 200;

/// Result of a processed relay request.
///
/// Every variant is answered with HTTP 200; success or failure is carried in
/// the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The outbound call never produced an HTTP response.
    TransportFailed { error: String, url: String },
    /// Upstream answered with a 2xx status.
    Delivered { status: u16, url: String, preview: String },
    /// Upstream answered with any other status.
    Rejected { status: u16, url: String, preview: String },
}

impl RelayOutcome {
    /// Classify an upstream response by its status code.
    pub fn from_status(status: u16, url: String, payload: &str) -> Self {
        let preview = preview(payload);
        if (200..300).contains(&status) {
            RelayOutcome::Delivered { status, url, preview }
        } else {
            RelayOutcome::Rejected { status, url, preview }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RelayOutcome::Delivered { .. })
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayOutcome::TransportFailed { .. } => "transport_error",
            RelayOutcome::Delivered { .. } => "delivered",
            RelayOutcome::Rejected { .. } => "rejected",
        }
    }

    /// Build the response body for this outcome.
    pub fn envelope(&self) -> Envelope {
        match self {
            RelayOutcome::TransportFailed { error, url } => Envelope {
                success: false,
                error: Some(format!("Transport error: {}", error)),
                url_used: Some(url.clone()),
                ..Envelope::default()
            },
            RelayOutcome::Delivered { status, url, preview } => Envelope {
                success: true,
                message: Some("Emote sent successfully via proxy".to_string()),
                status_code: Some(*status),
                url: Some(url.clone()),
                response_preview: Some(preview.clone()),
                ..Envelope::default()
            },
            RelayOutcome::Rejected { status, url, preview } => Envelope {
                success: false,
                error: Some(format!("Server returned error code: {}", status)),
                url: Some(url.clone()),
                response_preview: Some(preview.clone()),
                ..Envelope::default()
            },
        }
    }
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.envelope())).into_response()
    }
}

/// JSON body returned for a processed request.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_preview: Option<String>,
}

/// First [`PREVIEW_CHARS`] characters of the captured payload.
pub fn preview(payload: &str) -> String {
    payload.chars().take(PREVIEW_CHARS).collect()
}
