//! The relay operation: validate, build, dispatch once, classify.

use std::time::Instant;

use axum::http::Method;

use crate::observability::{metrics, RelayLog, ResultRecord};
use crate::relay::error::RelayError;
use crate::relay::join_url::build_join_url;
use crate::relay::outcome::RelayOutcome;
use crate::relay::payload::EmoteJoin;
use crate::upstream::Upstream;

/// Process one inbound request.
///
/// The OPTIONS preflight is answered by the HTTP layer before this is called;
/// here it is treated like any other non-POST method. Exactly one outbound
/// call is made for a valid POST; failures never retry.
pub async fn handle(
    method: &Method,
    body: &[u8],
    upstream: &dyn Upstream,
    log: &RelayLog,
) -> Result<RelayOutcome, RelayError> {
    if *method != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    let join = EmoteJoin::from_body(body)?;
    let url = build_join_url(&join);

    log.record_url(&url).await;
    tracing::debug!(url = %url, "Dispatching emote join");

    let start = Instant::now();
    let outcome = match upstream.fetch(&url).await {
        Ok(response) => {
            log.record_result(&ResultRecord {
                url: &url,
                http_code: response.status,
                error: String::new(),
                response_length: response.payload.len(),
            })
            .await;
            RelayOutcome::from_status(response.status, url, &response.payload)
        }
        Err(e) => {
            let error = e.to_string();
            log.record_result(&ResultRecord {
                url: &url,
                http_code: 0,
                error: error.clone(),
                response_length: 0,
            })
            .await;
            tracing::warn!(url = %url, error = %error, "Upstream transport error");
            RelayOutcome::TransportFailed { error, url }
        }
    };
    metrics::record_upstream(outcome.kind(), start);

    match &outcome {
        RelayOutcome::Delivered { status, url, .. } => {
            tracing::info!(url = %url, status = *status, "Emote delivered");
        }
        RelayOutcome::Rejected { status, url, .. } => {
            tracing::warn!(url = %url, status = *status, "Upstream rejected emote");
        }
        RelayOutcome::TransportFailed { .. } => {}
    }

    Ok(outcome)
}
