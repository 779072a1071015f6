//! End-to-end tests for page rendering over HTTP.

use std::sync::Arc;
use std::time::Duration;

use storefront_edge::config::StorefrontConfig;
use storefront_edge::csp::DirectiveSet;
use storefront_edge::http::{AppState, EntryContext, LoadContext, ServerEntry};
use storefront_edge::markup::{Element, Node};
use storefront_edge::render::RenderError;
use storefront_edge::ui::{ImageDescriptor, RouteContext, StorefrontApp};

mod common;

use common::{client, script_nonce, start_server, start_server_with_state, BROWSER_UA, CRAWLER_UA};

fn config_with_images(n: usize) -> StorefrontConfig {
    let mut config = StorefrontConfig::default();
    config.shop.checkout_domain = "checkout.example.com".into();
    config.shop.store_domain = "example.myshopify.com".into();
    config.home.title = "Example Store".into();
    config.home.carousel = (0..n)
        .map(|i| ImageDescriptor::new(format!("https://cdn.shopify.com/s/{i}.jpg"), format!("Banner {i}")))
        .collect();
    config
}

/// Streams a product list after a delay, optionally failing.
struct SlowApp {
    delay: Duration,
    fail: bool,
}

impl StorefrontApp for SlowApp {
    fn render(&self, ctx: &RouteContext) -> Result<Node, RenderError> {
        let delay = self.delay;
        let fail = self.fail;
        Ok(Element::new("html")
            .child(
                Element::new("body")
                    .child(Element::new("h1").child(Node::text(ctx.url.path().to_string())))
                    .child(Node::deferred(
                        Node::text("loading products"),
                        Box::pin(async move {
                            tokio::time::sleep(delay).await;
                            if fail {
                                Err(RenderError::Component("product query failed".into()))
                            } else {
                                Ok(Node::text("all products"))
                            }
                        }),
                    )),
            )
            .into())
    }
}

fn slow_state(config: &StorefrontConfig, app: SlowApp) -> AppState {
    AppState {
        entry: Arc::new(ServerEntry::from_config(config).unwrap()),
        context: Arc::new(EntryContext { app: Arc::new(app) }),
        load: Arc::new(LoadContext {
            shop: config.shop.clone(),
        }),
    }
}

#[tokio::test]
async fn test_home_page_headers_and_carousel() {
    let server = start_server(config_with_images(3)).await;
    let res = client()
        .get(server.url("/"))
        .header("User-Agent", BROWSER_UA)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/html");
    assert!(res.headers().contains_key("x-request-id"));

    let csp = res.headers()["content-security-policy"].to_str().unwrap().to_string();
    assert!(csp.ends_with(';'));
    let set = DirectiveSet::parse(&csp);
    assert_eq!(set.get("frame-ancestors"), Some("'none'"));
    assert_eq!(set.get("connect-src"), Some("'self' https://monorail-edge.shopifysvc.com"));
    assert_eq!(set.get("font-src"), Some("'self' https://cdnjs.cloudflare.com"));
    let nonce = script_nonce(&csp).expect("script-src nonce");

    let body = res.text().await.unwrap();
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("<title>Example Store</title>"));
    assert_eq!(body.matches("class=\"carousel-item").count(), 3);
    assert_eq!(body.matches("carousel-item active").count(), 1);
    assert!(body.contains(&format!("<script nonce=\"{nonce}\">window.__routeContext")));
}

#[tokio::test]
async fn test_empty_carousel_renders_nothing() {
    let server = start_server(config_with_images(0)).await;
    let body = client()
        .get(server.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("carousel"));
    assert!(body.contains("<main></main>"));
}

#[tokio::test]
async fn test_nonce_changes_per_request() {
    let server = start_server(config_with_images(1)).await;
    let client = client();
    let mut nonces = Vec::new();
    for _ in 0..2 {
        let res = client.get(server.url("/")).send().await.unwrap();
        let csp = res.headers()["content-security-policy"].to_str().unwrap().to_string();
        nonces.push(script_nonce(&csp).unwrap());
    }
    assert_ne!(nonces[0], nonces[1]);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = start_server(config_with_images(0)).await;
    let res = client()
        .get(server.url("/"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_crawler_receives_complete_document() {
    let config = StorefrontConfig::default();
    let state = slow_state(
        &config,
        SlowApp {
            delay: Duration::from_millis(100),
            fail: false,
        },
    );
    let server = start_server_with_state(config, state).await;

    let res = client()
        .get(server.url("/collections/all"))
        .header("User-Agent", CRAWLER_UA)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("<h1>/collections/all</h1>"));
    assert!(body.contains("<div hidden id=\"S:0\">all products</div>"));
}

#[tokio::test]
async fn test_browser_receives_streamed_document() {
    let config = StorefrontConfig::default();
    let state = slow_state(
        &config,
        SlowApp {
            delay: Duration::from_millis(100),
            fail: false,
        },
    );
    let server = start_server_with_state(config, state).await;

    let res = client()
        .get(server.url("/"))
        .header("User-Agent", BROWSER_UA)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("loading products"));
    assert!(body.contains("all products"));
}

#[tokio::test]
async fn test_render_error_for_crawler_is_500_with_body() {
    let config = StorefrontConfig::default();
    let state = slow_state(
        &config,
        SlowApp {
            delay: Duration::from_millis(10),
            fail: true,
        },
    );
    let server = start_server_with_state(config, state).await;

    let res = client()
        .get(server.url("/"))
        .header("User-Agent", CRAWLER_UA)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    assert!(res.headers().contains_key("content-security-policy"));
    let body = res.text().await.unwrap();
    assert!(body.contains("loading products"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = start_server(StorefrontConfig::default()).await;
    let json: serde_json::Value = client()
        .get(server.url("/healthz"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "ok");
}
