//! `reqwest`-backed upstream transport.

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION};
use reqwest::redirect::Policy;

use crate::config::UpstreamConfig;
use crate::upstream::{TransportError, Upstream, UpstreamResponse};

/// Upstream transport carrying the configured outbound policy.
#[derive(Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    include_headers: bool,
}

impl HttpUpstream {
    /// Build the HTTP client from the transport policy.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled for upstream requests");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .danger_accept_invalid_hostnames(config.accept_invalid_certs)
            .default_headers(headers)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            client,
            include_headers: config.include_headers,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, url: &str) -> Result<UpstreamResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(classify)?;
        let status = response.status();

        let mut payload = String::new();
        if self.include_headers {
            let _ = write!(payload, "{:?} {}\r\n", response.version(), status);
            for (name, value) in response.headers() {
                let _ = write!(
                    payload,
                    "{}: {}\r\n",
                    name,
                    String::from_utf8_lossy(value.as_bytes())
                );
            }
            payload.push_str("\r\n");
        }

        let body = response.text().await.map_err(classify)?;
        payload.push_str(&body);

        Ok(UpstreamResponse {
            status: status.as_u16(),
            payload,
        })
    }
}

/// Map a `reqwest` failure to a transport error with its full cause chain.
fn classify(err: reqwest::Error) -> TransportError {
    let detail = describe(&err);
    if err.is_timeout() {
        TransportError::Timeout(detail)
    } else if err.is_connect() {
        TransportError::Connect(detail)
    } else if err.is_redirect() {
        TransportError::Redirect(detail)
    } else if err.is_builder() {
        TransportError::InvalidUrl(detail)
    } else {
        TransportError::Other(detail)
    }
}

fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(detail, ": {}", cause);
        source = cause.source();
    }
    detail
}
