//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Logging first so later failures are reported
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::StorefrontConfig;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid crawler pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serve `config` until SIGINT/SIGTERM.
pub async fn run(config: StorefrontConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        store_domain = %config.shop.store_domain,
        carousel_images = config.home.carousel.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );
    if config.shop.store_domain.is_empty() || config.shop.checkout_domain.is_empty() {
        tracing::warn!("Shop domains not configured; baseline CSP will not list them");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let state = AppState::from_config(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config, state).run(listener, server_shutdown).await?;
    Ok(())
}
