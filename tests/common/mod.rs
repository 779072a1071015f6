//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use storefront_edge::config::StorefrontConfig;
use storefront_edge::http::{AppState, HttpServer};
use storefront_edge::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with default collaborators built from `config`.
#[allow(dead_code)]
pub async fn start_server(config: StorefrontConfig) -> TestServer {
    let state = AppState::from_config(&config).unwrap();
    start_server_with_state(config, state).await
}

/// Start a server with explicit state.
pub async fn start_server_with_state(config: StorefrontConfig, state: AppState) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, state);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestServer { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub const BROWSER_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
pub const CRAWLER_UA: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Extract the nonce from a CSP header's `script-src`.
pub fn script_nonce(csp: &str) -> Option<String> {
    csp.split(';')
        .map(str::trim)
        .find(|d| d.starts_with("script-src "))?
        .split_whitespace()
        .find_map(|t| t.strip_prefix("'nonce-")?.strip_suffix('\'').map(String::from))
}
