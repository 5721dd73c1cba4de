//! Emote join relay.
//!
//! Accepts a JSON emote join command on a single endpoint, forwards it to the
//! target emote server as one GET request and relays the result as JSON.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client POST ──▶ http::server ──▶ relay::payload ──▶ relay::join_url
//!                                                              │
//!                                                              ▼
//!     Client JSON ◀── relay::outcome ◀──────────────── upstream (one GET) ◀──▶ Emote server
//!
//!     Cross-cutting: config · observability (tracing, relay log, metrics) · lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use emote_relay::lifecycle::{self, Shutdown};
use emote_relay::HttpServer;

#[derive(Parser)]
#[command(name = "emote-relay")]
#[command(about = "Relay emote join commands to emote servers", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(short, long, env = "EMOTE_RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let lifecycle::Prepared { config, listener } =
        lifecycle::prepare(cli.config.as_deref()).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
