//! Root application tree handed to the server entry.

use std::sync::Arc;

use serde_json::json;
use url::Url;

use crate::markup::{Element, Node};
use crate::render::RenderError;
use crate::ui::carousel::render_carousel;
use crate::ui::image::{ImageComponent, ImageDescriptor};

/// Per-request data the application renders from.
#[derive(Debug, Clone)]
pub struct RouteContext {
    pub url: Url,
}

/// Builds the root markup tree for a request.
pub trait StorefrontApp: Send + Sync {
    fn render(&self, ctx: &RouteContext) -> Result<Node, RenderError>;
}

/// Home page: document shell, hero carousel and the hydration context.
pub struct HomePage {
    title: String,
    images: Vec<ImageDescriptor>,
    image: Arc<dyn ImageComponent>,
}

impl HomePage {
    pub fn new(
        title: impl Into<String>,
        images: Vec<ImageDescriptor>,
        image: Arc<dyn ImageComponent>,
    ) -> Self {
        Self {
            title: title.into(),
            images,
            image,
        }
    }
}

impl StorefrontApp for HomePage {
    fn render(&self, ctx: &RouteContext) -> Result<Node, RenderError> {
        let head = Element::new("head")
            .child(Element::new("meta").attr("charset", "utf-8"))
            .child(
                Element::new("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width,initial-scale=1"),
            )
            .child(Element::new("title").child(Node::text(self.title.as_str())));

        let mut main = Element::new("main");
        if let Some(carousel) = render_carousel(&self.images, self.image.as_ref()) {
            main = main.child(carousel);
        }

        let body = Element::new("body")
            .child(main)
            .child(context_script(&self.title, ctx)?);

        Ok(Element::new("html")
            .attr("lang", "en")
            .child(head)
            .child(body)
            .into())
    }
}

/// Inline script exposing the route context to the client bundle.
fn context_script(title: &str, ctx: &RouteContext) -> Result<Element, RenderError> {
    let payload = serde_json::to_string(&json!({
        "title": title,
        "url": ctx.url.as_str(),
        "path": ctx.url.path(),
    }))
    .map_err(|e| RenderError::Component(e.to_string()))?;

    // The configured title is free text; `</script>` in it would end the tag.
    let payload = payload.replace('<', "\\u003c");
    Ok(Element::new("script").child(Node::raw(format!("window.__routeContext = {payload};"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::image::LazyImage;

    fn ctx(url: &str) -> RouteContext {
        RouteContext {
            url: Url::parse(url).unwrap(),
        }
    }

    #[test]
    fn test_home_page_includes_carousel() {
        let page = HomePage::new(
            "Shop",
            vec![ImageDescriptor::new("/a.jpg", "A")],
            Arc::new(LazyImage),
        );
        let html = page.render(&ctx("https://shop.example.com/")).unwrap().to_html();
        assert!(html.starts_with("<html lang=\"en\">"));
        assert!(html.contains("<title>Shop</title>"));
        assert!(html.contains("carousel-item active"));
    }

    #[test]
    fn test_home_page_without_images() {
        let page = HomePage::new("Shop", Vec::new(), Arc::new(LazyImage));
        let html = page.render(&ctx("https://shop.example.com/")).unwrap().to_html();
        assert!(html.contains("<main></main>"));
    }

    #[test]
    fn test_context_script_escapes_title_markup() {
        let page = HomePage::new("Shoes </script><script>alert(1)", Vec::new(), Arc::new(LazyImage));
        let html = page
            .render(&ctx("https://shop.example.com/search?q=boots"))
            .unwrap()
            .to_html();
        assert!(html.contains(r#""title":"Shoes \u003c/script>\u003cscript>alert(1)""#));
        assert!(html.contains(r#""url":"https://shop.example.com/search?q=boots""#));
        assert_eq!(html.matches("</script>").count(), 1);
    }
}
