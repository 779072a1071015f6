//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::csp::CspOverrides;
use crate::ui::ImageDescriptor;

/// Root configuration for the storefront server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Shop domains fed to the baseline content security policy.
    pub shop: ShopConfig,

    /// Local content security policy overrides.
    pub csp: CspConfig,

    /// Crawler detection settings.
    pub bots: BotConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Home page content.
    pub home: HomeConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Shop domains. Overridden by `PUBLIC_CHECKOUT_DOMAIN` / `PUBLIC_STORE_DOMAIN`.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ShopConfig {
    pub checkout_domain: String,
    pub store_domain: String,
}

/// Content security policy settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CspConfig {
    /// Source lists for the five directives this storefront always controls.
    pub overrides: CspOverrides,
}

/// Crawler detection settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BotConfig {
    /// Additional case-insensitive user-agent patterns.
    pub extra_patterns: Vec<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time for a request/response in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Home page content.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Document title.
    pub title: String,

    /// Hero carousel images, in display order.
    pub carousel: Vec<ImageDescriptor>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            title: "Storefront".to_string(),
            carousel: Vec::new(),
        }
    }
}
