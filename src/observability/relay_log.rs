//! Append-only relay log file.
//!
//! Line formats:
//! ```text
//! {"timestamp":"2024-01-01 12:00:00","method":"POST","ip":"10.0.0.1"}
//! URL: http://host/join?tc=...&emote_id=...&uid1=...
//! RESULT: {"url":"...","http_code":200,"error":"","response_length":512}
//! ```
//!
//! Each record is written with a single append so concurrent requests may
//! interleave lines but never split one. Write failures are reported through
//! `tracing` and swallowed.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::config::RelayLogConfig;

/// Record written for every inbound non-preflight request.
#[derive(Debug, Serialize)]
pub struct RequestRecord<'a> {
    pub timestamp: String,
    pub method: &'a str,
    pub ip: String,
}

/// Record written after the outbound attempt.
#[derive(Debug, Serialize)]
pub struct ResultRecord<'a> {
    pub url: &'a str,
    /// Upstream status, 0 when no response was received.
    pub http_code: u16,
    /// Transport error text, empty on a received response.
    pub error: String,
    pub response_length: usize,
}

/// Handle to the relay log file. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct RelayLog {
    path: Option<PathBuf>,
}

impl RelayLog {
    /// Log to the given file, creating it on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    /// A sink that drops every record.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn from_config(config: &RelayLogConfig) -> Self {
        if config.enabled {
            Self::new(&config.path)
        } else {
            Self::disabled()
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record an inbound request.
    pub async fn record_request(&self, method: &str, ip: &str) {
        let record = RequestRecord {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            method,
            ip: ip.to_string(),
        };
        self.append_json("", &record).await;
    }

    /// Record the URL about to be dispatched.
    pub async fn record_url(&self, url: &str) {
        self.append(&format!("URL: {}", url)).await;
    }

    /// Record the outcome of the outbound attempt.
    pub async fn record_result(&self, record: &ResultRecord<'_>) {
        self.append_json("RESULT: ", record).await;
    }

    async fn append_json<T: Serialize>(&self, prefix: &str, record: &T) {
        match serde_json::to_string(record) {
            Ok(json) => self.append(&format!("{}{}", prefix, json)).await,
            Err(e) => tracing::warn!(error = %e, "Failed to serialize relay log record"),
        }
    }

    async fn append(&self, line: &str) {
        let Some(path) = &self.path else {
            return;
        };

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let result = async {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            file.write_all(buf.as_bytes()).await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "Failed to append to relay log");
        }
    }
}
