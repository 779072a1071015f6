//! Baseline policy construction.
//!
//! The commerce platform owns the baseline. `PolicyConstructor` is the seam;
//! `PlatformPolicy` reproduces the platform's default directives so the
//! server runs standalone.

use crate::config::ShopConfig;
use crate::csp::nonce::{generate_nonce, NonceProvider};

/// Output of a policy constructor for one request.
#[derive(Debug, Clone)]
pub struct ContentSecurityPolicy {
    pub nonce: String,
    /// Semicolon-delimited baseline directives.
    pub header: String,
    pub provider: NonceProvider,
}

/// Builds the baseline CSP for a request.
pub trait PolicyConstructor: Send + Sync {
    fn create(&self, shop: &ShopConfig) -> ContentSecurityPolicy;
}

/// Default platform baseline with a fresh random nonce per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformPolicy;

impl PolicyConstructor for PlatformPolicy {
    fn create(&self, shop: &ShopConfig) -> ContentSecurityPolicy {
        let nonce = generate_nonce();
        let header = baseline_header(shop, &nonce);
        ContentSecurityPolicy {
            provider: NonceProvider::new(nonce.as_str()),
            nonce,
            header,
        }
    }
}

fn baseline_header(shop: &ShopConfig, nonce: &str) -> String {
    let mut connect = vec![
        "'self'".to_string(),
        "https://monorail-edge.shopifysvc.com".to_string(),
    ];
    connect.extend(
        [&shop.checkout_domain, &shop.store_domain]
            .into_iter()
            .filter(|d| !d.trim().is_empty())
            .map(|d| with_scheme(d.trim())),
    );

    [
        "base-uri 'self'".to_string(),
        format!("default-src 'self' 'nonce-{nonce}' https://cdn.shopify.com https://shopify.com"),
        "frame-ancestors 'none'".to_string(),
        "style-src 'self' 'unsafe-inline' https://cdn.shopify.com".to_string(),
        format!("connect-src {}", connect.join(" ")),
    ]
    .join("; ")
}

fn with_scheme(domain: &str) -> String {
    if domain.contains("://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}
