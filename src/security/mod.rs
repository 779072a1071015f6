//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming page request:
//!     → bot.rs (classify user agent: crawler or browser)
//!     → [entry renders page, builds CSP]
//!     → headers.rs (Content-Type + Content-Security-Policy)
//! ```

pub mod bot;
pub mod headers;

pub use bot::{CrawlerClassifier, UserAgentPatterns};
