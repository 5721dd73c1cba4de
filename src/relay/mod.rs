//! Emote relay subsystem.
//!
//! # Data Flow
//! ```text
//! POST body
//!     → payload.rs (decode, required fields, coercion)
//!     → join_url.rs (normalize server, encode, uid slots)
//!     → upstream (exactly one GET)
//!     → outcome.rs (classify, JSON envelope)
//! ```
//!
//! # Design Decisions
//! - `handle` takes the transport and log sink as parameters; no ambient state
//! - Protocol failures are `RelayError`, upstream/transport failures are
//!   `RelayOutcome` variants answered with 200

pub mod error;
pub mod handler;
pub mod join_url;
pub mod outcome;
pub mod payload;

pub use error::RelayError;
pub use handler::handle;
pub use join_url::build_join_url;
pub use outcome::{Envelope, RelayOutcome};
pub use payload::EmoteJoin;
