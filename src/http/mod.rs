//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, preflight, dispatch)
//!     → request.rs (request ID, client IP, bounded body read)
//!     → relay::handle (validate, build URL, one upstream call)
//!     → response.rs (JSON content type + CORS headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
