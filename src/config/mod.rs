//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply PUBLIC_* env overrides)
//!     → validation.rs (semantic checks)
//!     → StorefrontConfig (validated, immutable)
//!     → shared via Arc with the request handler
//! ```
//!
//! # Design Decisions
//! - Environment is read once at load time, never per request
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BotConfig, CspConfig, HomeConfig, ListenerConfig, LogFormat, ObservabilityConfig, ShopConfig,
    StorefrontConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
