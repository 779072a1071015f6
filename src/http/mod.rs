//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, absolute page URL)
//!     → entry.rs (CSP, streaming render, crawler wait)
//!     → streamed response to client
//! ```

pub mod entry;
pub mod request;
pub mod server;

pub use entry::{EntryContext, EntryRequest, EntryResponse, LoadContext, ServerEntry};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
