//! Configuration validation.
//!
//! # Responsibilities
//! - Validate value ranges and addresses
//! - Reject values that would corrupt the CSP header
//! - Check that crawler patterns compile
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StorefrontConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::StorefrontConfig;
use crate::security::bot::UserAgentPatterns;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: {value:?} may not contain whitespace, ';' or ','")]
    InvalidDomain { field: &'static str, value: String },

    #[error("{field}: source list may not contain ';' or control characters")]
    InvalidSourceList { field: &'static str },

    #[error("bots.extra_patterns: {0}")]
    InvalidPattern(String),

    #[error("observability.log_level: unknown level {0:?}")]
    InvalidLogLevel(String),
}

/// Validate `config`, collecting every error.
pub fn validate_config(config: &StorefrontConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }

    check_domain("shop.checkout_domain", &config.shop.checkout_domain, &mut errors);
    check_domain("shop.store_domain", &config.shop.store_domain, &mut errors);

    let overrides = &config.csp.overrides;
    for (field, value) in [
        ("csp.overrides.img_src", &overrides.img_src),
        ("csp.overrides.style_src", &overrides.style_src),
        ("csp.overrides.script_src", &overrides.script_src),
        ("csp.overrides.connect_src", &overrides.connect_src),
        ("csp.overrides.font_src", &overrides.font_src),
    ] {
        if value.contains(';') || value.chars().any(char::is_control) {
            errors.push(ValidationError::InvalidSourceList { field });
        }
    }

    if let Err(e) = UserAgentPatterns::new(&config.bots.extra_patterns) {
        errors.push(ValidationError::InvalidPattern(e.to_string()));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

/// Empty domains are allowed; the baseline policy skips them.
fn check_domain(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == ';' || c == ',')
    {
        errors.push(ValidationError::InvalidDomain {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&StorefrontConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = StorefrontConfig::default();
        config.listener.bind_address = "localhost".into();
        config.shop.store_domain = "shop.example.com; script-src *".into();
        config.csp.overrides.img_src = "'self'; default-src *".into();
        config.bots.extra_patterns = vec!["[".into()];
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::InvalidSourceList {
            field: "csp.overrides.img_src"
        }));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = StorefrontConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());
        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
