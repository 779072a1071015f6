//! Storefront edge server library.

pub mod config;
pub mod csp;
pub mod http;
pub mod lifecycle;
pub mod markup;
pub mod observability;
pub mod render;
pub mod security;
pub mod ui;

pub use config::StorefrontConfig;
pub use http::{AppState, HttpServer, ServerEntry};
pub use lifecycle::Shutdown;
