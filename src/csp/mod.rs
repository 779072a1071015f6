//! Content-Security-Policy subsystem.
//!
//! # Data Flow
//! ```text
//! ShopConfig
//!     → policy.rs (PolicyConstructor: nonce + baseline header + NonceProvider)
//!     → directives.rs (tokenize baseline into an ordered DirectiveSet)
//!     → overrides.rs (write the five local overrides over the baseline)
//!     → header string for the response
//!
//! nonce.rs: NonceProvider stamps the same nonce onto inline scripts
//! ```
//!
//! # Design Decisions
//! - Directive names are compared in lowercase
//! - A directive value is everything after the name, never re-split
//! - The directive set is per request and never shared

pub mod directives;
pub mod nonce;
pub mod overrides;
pub mod policy;

pub use directives::{Directive, DirectiveSet};
pub use nonce::{generate_nonce, NonceProvider};
pub use overrides::{merge_policy, CspOverrides, OVERRIDE_DIRECTIVES};
pub use policy::{ContentSecurityPolicy, PlatformPolicy, PolicyConstructor};
