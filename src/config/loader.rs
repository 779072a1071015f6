//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::StorefrontConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `shop.checkout_domain`.
pub const ENV_CHECKOUT_DOMAIN: &str = "PUBLIC_CHECKOUT_DOMAIN";
/// Environment variable overriding `shop.store_domain`.
pub const ENV_STORE_DOMAIN: &str = "PUBLIC_STORE_DOMAIN";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, and validate.
pub fn load_config(path: Option<&Path>) -> Result<StorefrontConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => StorefrontConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `PUBLIC_*` overrides using `lookup`. Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut StorefrontConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(domain) = non_blank(ENV_CHECKOUT_DOMAIN) {
        config.shop.checkout_domain = domain;
    }
    if let Some(domain) = non_blank(ENV_STORE_DOMAIN) {
        config.shop.store_domain = domain;
    }
}
