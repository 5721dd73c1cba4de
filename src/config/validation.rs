//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("listener.route_path must start with '/', got '{0}'")]
    InvalidRoutePath(String),

    #[error("timeouts.request_secs ({request}) must exceed upstream.timeout_secs ({upstream})")]
    RequestNotAboveUpstream { request: u64, upstream: u64 },

    #[error("relay_log.path must not be empty when the relay log is enabled")]
    EmptyLogPath,

    #[error("upstream.connect_timeout_secs ({connect}) exceeds upstream.timeout_secs ({total})")]
    ConnectExceedsTotal { connect: u64, total: u64 },
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if !config.listener.route_path.starts_with('/') {
        errors.push(ValidationError::InvalidRoutePath(
            config.listener.route_path.clone(),
        ));
    }

    let upstream = &config.upstream;
    if upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("upstream.timeout_secs"));
    }
    if upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("upstream.connect_timeout_secs"));
    }
    if upstream.connect_timeout_secs > upstream.timeout_secs && upstream.timeout_secs > 0 {
        errors.push(ValidationError::ConnectExceedsTotal {
            connect: upstream.connect_timeout_secs,
            total: upstream.timeout_secs,
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_secs"));
    } else if config.timeouts.request_secs <= upstream.timeout_secs {
        errors.push(ValidationError::RequestNotAboveUpstream {
            request: config.timeouts.request_secs,
            upstream: upstream.timeout_secs,
        });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroValue("security.max_body_size"));
    }

    if config.relay_log.enabled && config.relay_log.path.trim().is_empty() {
        errors.push(ValidationError::EmptyLogPath);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
