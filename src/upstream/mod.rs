//! Outbound transport subsystem.
//!
//! # Data Flow
//! ```text
//! relay handler (built URL)
//!     → Upstream::fetch (one GET, no retries)
//!     → UpstreamResponse (status + captured payload)
//!       or TransportError (DNS, connect, TLS, timeout)
//! ```
//!
//! # Design Decisions
//! - The transport is a trait object so the handler can run against a mock
//! - Non-2xx statuses are responses, not errors
//! - Transport policy (timeouts, redirects, TLS) lives in `UpstreamConfig`

pub mod client;

use async_trait::async_trait;
use thiserror::Error;

pub use client::HttpUpstream;

/// What came back from the upstream server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Captured payload; includes the response head when header capture is on.
    pub payload: String,
}

/// The outbound call failed before an HTTP response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Too many redirects: {0}")]
    Redirect(String),

    #[error("Malformed URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(String),
}

/// A single-shot HTTP GET transport.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Perform one GET request against `url`.
    async fn fetch(&self, url: &str) -> Result<UpstreamResponse, TransportError>;
}
