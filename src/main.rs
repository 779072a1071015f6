//! Storefront edge server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request id, trace, timeout)
//!                         │
//!                         ▼
//!                     http::entry ──▶ csp::policy   (nonce + baseline)
//!                         │       ──▶ csp::overrides (merged header)
//!                         │       ──▶ ui::app        (root tree, carousel)
//!                         │       ──▶ render::html   (shell, then deferred chunks)
//!                         │       ──▶ security::bot  (crawler? wait for all_ready)
//!                         ▼
//!     Client Response ◀── text/html + Content-Security-Policy, streamed body
//! ```

use std::path::PathBuf;

use clap::Parser;

use storefront_edge::config::load_config;
use storefront_edge::lifecycle::startup;
use storefront_edge::observability::logging;

#[derive(Parser)]
#[command(name = "storefront-edge")]
#[command(about = "Server-rendered storefront with a merged Content-Security-Policy", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("storefront-edge v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
