//! Server entry: one call per page request.
//!
//! # Responsibilities
//! - Build the per-request CSP (platform baseline + local overrides)
//! - Render the app through the streaming renderer, wrapped in the nonce provider
//! - Hold the response for crawlers until every deferred boundary settled
//! - Turn render errors into a 500 without dropping the body
//!
//! # Design Decisions
//! - Collaborators are trait objects so tests and embedders can swap them
//! - The status is read when the response head is built; errors reported
//!   after that (streamed boundaries for browsers) are logged and counted only

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    response::Response,
};
use url::Url;

use crate::config::{ShopConfig, StorefrontConfig};
use crate::csp::{merge_policy, CspOverrides, PlatformPolicy, PolicyConstructor};
use crate::markup::{Element, Node};
use crate::observability::metrics;
use crate::render::{
    panic_message, AbortSignal, HtmlStreamRenderer, RenderError, RenderOptions, RenderStream,
    StreamingRenderer,
};
use crate::security::bot::{CrawlerClassifier, UserAgentPatterns};
use crate::security::headers::apply_page_headers;
use crate::ui::{RouteContext, StorefrontApp};

/// The parts of an HTTP request the entry needs.
#[derive(Debug, Clone)]
pub struct EntryRequest {
    /// Correlates log lines with the `x-request-id` the client sees.
    pub request_id: String,
    pub url: Url,
    pub headers: HeaderMap,
    pub signal: AbortSignal,
}

/// Render context: the application to render.
#[derive(Clone)]
pub struct EntryContext {
    pub app: Arc<dyn StorefrontApp>,
}

/// Load context: process-wide, read-only settings.
#[derive(Debug, Clone, Default)]
pub struct LoadContext {
    pub shop: ShopConfig,
}

/// Errors the entry recovers from locally.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("content security policy is not a valid header value: {0}")]
    InvalidHeader(#[from] axum::http::header::InvalidHeaderValue),
}

/// Result of `ServerEntry::handle_request`.
pub struct EntryResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: RenderStream,
    /// The request was classified as a crawler.
    pub bot: bool,
}

impl EntryResponse {
    /// Build the HTTP response. `guard` is dropped with the body.
    pub fn into_response<G: Send + 'static>(self, guard: G) -> Response {
        let mut response = Response::new(self.body.into_body(guard));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }

    /// Buffer the whole body. Used by tests and non-streaming callers.
    pub async fn into_string(self) -> (StatusCode, HeaderMap, String) {
        let body = self.body.collect_string().await;
        (self.status, self.headers, body)
    }
}

/// Request handler with its injected collaborators.
#[derive(Clone)]
pub struct ServerEntry {
    policy: Arc<dyn PolicyConstructor>,
    renderer: Arc<dyn StreamingRenderer>,
    crawlers: Arc<dyn CrawlerClassifier>,
    overrides: CspOverrides,
}

impl ServerEntry {
    pub fn new(
        policy: Arc<dyn PolicyConstructor>,
        renderer: Arc<dyn StreamingRenderer>,
        crawlers: Arc<dyn CrawlerClassifier>,
        overrides: CspOverrides,
    ) -> Self {
        Self {
            policy,
            renderer,
            crawlers,
            overrides,
        }
    }

    /// Default collaborators configured from `config`.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, regex::Error> {
        Ok(Self::new(
            Arc::new(PlatformPolicy),
            Arc::new(HtmlStreamRenderer),
            Arc::new(UserAgentPatterns::new(&config.bots.extra_patterns)?),
            config.csp.overrides.clone(),
        ))
    }

    pub async fn handle_request(
        &self,
        request: EntryRequest,
        status: StatusCode,
        mut headers: HeaderMap,
        context: &EntryContext,
        load: &LoadContext,
    ) -> EntryResponse {
        let policy = self.policy.create(&load.shop);
        let csp = merge_policy(&policy.header, &self.overrides, &policy.nonce);

        let failed = Arc::new(AtomicBool::new(false));
        let on_error = {
            let failed = failed.clone();
            let url = request.url.to_string();
            let request_id = request.request_id.clone();
            Arc::new(move |err: &RenderError| {
                tracing::error!(request_id = %request_id, url = %url, error = %err, "Render error");
                metrics::record_render_error();
                failed.store(true, Ordering::SeqCst);
            })
        };

        let route = RouteContext {
            url: request.url.clone(),
        };
        let rendered = catch_unwind(AssertUnwindSafe(|| context.app.render(&route)))
            .unwrap_or_else(|panic| Err(RenderError::Component(panic_message(panic.as_ref()))));
        let root = match rendered {
            Ok(root) => root,
            Err(err) => {
                on_error(&err);
                error_document()
            }
        };

        let options = RenderOptions {
            nonce: policy.nonce.clone(),
            signal: request.signal.clone(),
            on_error,
        };
        let mut body = self
            .renderer
            .render(policy.provider.wrap(root), options)
            .await;

        let user_agent = request
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok());
        let bot = self.crawlers.is_bot(user_agent);
        if bot {
            tracing::debug!(user_agent = ?user_agent, "Crawler detected, waiting for full render");
            body.all_ready().await;
        }

        let mut status = if failed.load(Ordering::SeqCst) {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            status
        };

        if let Err(err) = apply_page_headers(&mut headers, &csp).map_err(EntryError::from) {
            tracing::error!(error = %err, "Dropping Content-Security-Policy header");
            status = StatusCode::INTERNAL_SERVER_ERROR;
        }

        EntryResponse {
            status,
            headers,
            body,
            bot,
        }
    }
}

/// Minimal document rendered when the app fails before producing a tree.
fn error_document() -> Node {
    Element::new("html")
        .attr("lang", "en")
        .child(Element::new("head").child(Element::new("title").child(Node::text("Error"))))
        .child(
            Element::new("body").child(
                Element::new("main")
                    .child(Element::new("h1").child(Node::text("Something went wrong"))),
            ),
        )
        .into()
}
