//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay endpoint
//! - Wire up middleware (tracing, request ID, relay headers)
//! - Bound each request by the inbound timeout, answering in JSON when it fires
//! - Bind server to listener
//! - Answer preflight, log inbound requests, dispatch to the relay handler

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::request::{self, UuidRequestId, X_REQUEST_ID};
use crate::http::response::with_relay_headers;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::{metrics, RelayLog};
use crate::relay::{self, RelayError};
use crate::upstream::{HttpUpstream, Upstream};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn Upstream>,
    pub log: RelayLog,
    pub max_body_size: usize,
    /// Total time allowed for reading the body and relaying it.
    pub request_timeout: Duration,
}

/// HTTP server for the emote relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by the configured `reqwest` transport.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let upstream = Arc::new(HttpUpstream::new(&config.upstream)?);
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create a server with an explicit transport.
    pub fn with_upstream(config: RelayConfig, upstream: Arc<dyn Upstream>) -> Self {
        let state = AppState {
            upstream,
            log: RelayLog::from_config(&config.relay_log),
            max_body_size: config.security.max_body_size,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let router = Router::new()
            .route(&config.listener.route_path, any(relay_handler))
            .with_state(state);

        with_relay_headers(router)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// The router, for driving the server without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C/SIGTERM or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            route = %self.config.listener.route_path,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay endpoint handler.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();

    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let request_id = request::request_id(&request);
    let client_ip = request::client_ip(&request);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        client_ip = %client_ip,
        "Relay request"
    );
    state.log.record_request(method.as_str(), &client_ip).await;

    let relayed = async {
        match request::read_body(request.into_body(), state.max_body_size).await {
            Ok(body) => relay::handle(&method, &body, state.upstream.as_ref(), &state.log).await,
            Err(e) if method == Method::POST => {
                tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
                Err(RelayError::InvalidInput)
            }
            Err(_) => Err(RelayError::MethodNotAllowed),
        }
    };

    let result = match tokio::time::timeout(state.request_timeout, relayed).await {
        Ok(result) => result,
        Err(elapsed) => Err(RelayError::internal(&elapsed)),
    };

    match result {
        Ok(outcome) => {
            metrics::record_request(method.as_str(), outcome.kind());
            outcome.into_response()
        }
        Err(e) => {
            if let RelayError::Internal { message, .. } = &e {
                tracing::error!(request_id = %request_id, error = %message, "Relay processing failed");
            }
            metrics::record_request(method.as_str(), e.kind());
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{TransportError, UpstreamResponse};
    use async_trait::async_trait;
    use axum::http::header;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct StaticUpstream(u16, &'static str);

    #[async_trait]
    impl Upstream for StaticUpstream {
        async fn fetch(&self, _url: &str) -> Result<UpstreamResponse, TransportError> {
            Ok(UpstreamResponse {
                status: self.0,
                payload: self.1.to_string(),
            })
        }
    }

    struct SlowUpstream(Duration);

    #[async_trait]
    impl Upstream for SlowUpstream {
        async fn fetch(&self, _url: &str) -> Result<UpstreamResponse, TransportError> {
            tokio::time::sleep(self.0).await;
            Ok(UpstreamResponse {
                status: 200,
                payload: "late".to_string(),
            })
        }
    }

    fn app(status: u16, payload: &'static str) -> Router {
        let mut config = RelayConfig::default();
        config.relay_log.enabled = false;
        HttpServer::with_upstream(config, Arc::new(StaticUpstream(status, payload))).router()
    }

    async fn send(app: Router, method: Method, body: &str) -> (StatusCode, Response) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        (response.status(), response)
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let (status, response) = send(app(200, ""), Method::OPTIONS, "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, GET, OPTIONS");
        assert!(response.headers().contains_key(X_REQUEST_ID));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_get_not_allowed() {
        let (status, response) = send(app(200, ""), Method::GET, "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            json_body(response).await,
            json!({ "success": false, "error": "Method not allowed. Use POST." })
        );
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let (status, response) = send(app(200, ""), Method::POST, "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Invalid JSON input"));
    }

    #[tokio::test]
    async fn test_missing_field() {
        let (status, response) =
            send(app(200, ""), Method::POST, r#"{"server":"http://h","tc":"t"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], json!("Missing field: emote_id"));
    }

    #[tokio::test]
    async fn test_wrong_type_is_internal_error() {
        let (status, response) = send(
            app(200, ""),
            Method::POST,
            r#"{"server":"http://h","tc":"t","emote_id":"e","uids":{"a":1}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().starts_with("Exception: "));
        assert!(body["trace"].is_string());
    }

    #[tokio::test]
    async fn test_delivered_response() {
        let payload = r#"{"status":"joined"}"#;
        let (status, response) = send(
            app(200, payload),
            Method::POST,
            r#"{"server":"http://host/","tc":"a b","emote_id":"e1","uids":["u1","","u3"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "success": true,
                "message": "Emote sent successfully via proxy",
                "status_code": 200,
                "url": "http://host/join?tc=a+b&emote_id=e1&uid1=u1&uid3=u3",
                "response_preview": payload,
            })
        );
    }

    #[tokio::test]
    async fn test_upstream_error_keeps_outer_200() {
        let (status, response) = send(
            app(503, "busy"),
            Method::POST,
            r#"{"server":"http://h","tc":"t","emote_id":"e","uids":[]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Server returned error code: 503"));
    }

    #[tokio::test]
    async fn test_request_timeout_answers_json() {
        let mut config = RelayConfig::default();
        config.relay_log.enabled = false;
        config.timeouts.request_secs = 1;
        let app = HttpServer::with_upstream(config, Arc::new(SlowUpstream(Duration::from_secs(3))))
            .router();

        let (status, response) = send(
            app,
            Method::POST,
            r#"{"server":"http://h","tc":"t","emote_id":"e","uids":[]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = json_body(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().starts_with("Exception: "));
        assert!(body["trace"].is_string());
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = RelayConfig::default();
        config.relay_log.enabled = false;
        config.security.max_body_size = 16;
        let app = HttpServer::with_upstream(config, Arc::new(StaticUpstream(200, ""))).router();

        let (status, _) = send(app, Method::POST, &"x".repeat(64)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
