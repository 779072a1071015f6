//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the page handler and health endpoint
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and drain on shutdown
//! - Hand every page request to the server entry

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::StorefrontConfig;
use crate::http::entry::{EntryContext, EntryRequest, LoadContext, ServerEntry};
use crate::http::request::{
    propagate_request_id_layer, request_id, request_url, set_request_id_layer,
};
use crate::observability::metrics;
use crate::render::AbortController;
use crate::ui::{HomePage, LazyImage};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub entry: Arc<ServerEntry>,
    pub context: Arc<EntryContext>,
    pub load: Arc<LoadContext>,
}

impl AppState {
    /// Default collaborators and the configured home page.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, regex::Error> {
        let app = HomePage::new(
            config.home.title.clone(),
            config.home.carousel.clone(),
            Arc::new(LazyImage),
        );
        Ok(Self {
            entry: Arc::new(ServerEntry::from_config(config)?),
            context: Arc::new(EntryContext { app: Arc::new(app) }),
            load: Arc::new(LoadContext {
                shop: config.shop.clone(),
            }),
        })
    }
}

/// HTTP server for the storefront.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and state.
    pub fn new(config: StorefrontConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(&config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &StorefrontConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .fallback(page_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

/// Render a storefront page.
async fn page_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, _body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();

    let url = match request_url(&parts) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Unparseable request URL");
            metrics::record_request(400, false, start);
            return (StatusCode::BAD_REQUEST, "Invalid request URL").into_response();
        }
    };

    tracing::debug!(request_id = %request_id, url = %url, "Rendering page");

    // Dropped together with the response body, which aborts pending boundaries
    // when the client disconnects.
    let controller = AbortController::new();
    let entry_request = EntryRequest {
        request_id: request_id.clone(),
        url,
        headers: parts.headers,
        signal: controller.signal(),
    };

    let response = state
        .entry
        .handle_request(
            entry_request,
            StatusCode::OK,
            HeaderMap::new(),
            &state.context,
            &state.load,
        )
        .await;

    metrics::record_request(response.status.as_u16(), response.bot, start);
    tracing::debug!(
        request_id = %request_id,
        status = %response.status,
        bot = response.bot,
        "Page response ready"
    );

    response.into_response(controller)
}
