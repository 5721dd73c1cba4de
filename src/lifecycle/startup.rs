//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics in dependency order
//! - Bind the listener last, so traffic only arrives when ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No config file means all defaults

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, RelayConfig};
use crate::observability::{init_logging, metrics};

/// Fatal startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything `main` needs to start serving.
pub struct Prepared {
    pub config: RelayConfig,
    pub listener: TcpListener,
}

/// Resolve configuration from an optional file path.
pub fn resolve_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(RelayConfig::default()),
    }
}

/// Run the startup sequence: config → logging → metrics → listener.
pub async fn prepare(config_path: Option<&Path>) -> Result<Prepared, StartupError> {
    let config = resolve_config(config_path)?;

    init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        route = %config.listener.route_path,
        upstream_timeout_secs = config.upstream.timeout_secs,
        relay_log = config.relay_log.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    tracing::info!(address = ?listener.local_addr().ok(), "Listening for connections");

    Ok(Prepared { config, listener })
}
