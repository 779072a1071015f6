//! Default streaming renderer: HTML shell first, deferred boundaries after.

use std::panic::AssertUnwindSafe;

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;

use crate::markup::{DeferredContent, Element, Node};
use crate::render::{
    panic_message, RenderError, RenderOptions, RenderSink, RenderStream, StreamingRenderer,
};

/// Client-side swap: move streamed content from `S:n` over the fallback after `B:n`.
const SWAP_FUNCTION: &str = "function $RC(b,s){var t=document.getElementById(b),c=document.getElementById(s);if(!t||!c)return;var p=t.parentNode,n=t.nextSibling;while(n&&!(n.nodeType===8&&n.data==='/$')){var x=n.nextSibling;p.removeChild(n);n=x}while(c.firstChild)p.insertBefore(c.firstChild,t);p.removeChild(t);c.parentNode.removeChild(c)}";

/// Writes `<!DOCTYPE html>` and the tree, leaving a marked template for each
/// deferred boundary. Boundaries resolve concurrently and each one is
/// streamed as soon as it settles.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlStreamRenderer;

impl StreamingRenderer for HtmlStreamRenderer {
    fn render(&self, root: Node, options: RenderOptions) -> BoxFuture<'static, RenderStream> {
        Box::pin(async move {
            let (sink, stream) = RenderStream::channel();
            let mut boundaries = Boundaries::default();

            let mut shell = String::from("<!DOCTYPE html>");
            boundaries.write(root, &mut shell);
            sink.send(shell);

            if boundaries.pending.is_empty() {
                sink.finish();
            } else {
                tokio::spawn(stream_boundaries(boundaries, sink, options));
            }
            stream
        })
    }
}

type Settled = (usize, Result<Node, RenderError>);

#[derive(Default)]
struct Boundaries {
    next_id: usize,
    pending: Vec<(usize, DeferredContent)>,
}

impl Boundaries {
    /// Serialize `node`, queueing deferred content instead of awaiting it.
    fn write(&mut self, node: Node, out: &mut String) {
        match node {
            Node::Element(el) => {
                el.write_open_tag(out);
                if !el.is_void() {
                    let Element { tag, children, .. } = el;
                    for child in children {
                        self.write(child, out);
                    }
                    out.push_str("</");
                    out.push_str(&tag);
                    out.push('>');
                }
            }
            Node::Fragment(children) => {
                for child in children {
                    self.write(child, out);
                }
            }
            Node::Deferred { fallback, content } => {
                let id = self.next_id;
                self.next_id += 1;
                out.push_str(&format!("<!--$?--><template id=\"B:{id}\"></template>"));
                out.push_str(&fallback.to_html());
                out.push_str("<!--/$-->");
                self.pending.push((id, content));
            }
            other => out.push_str(&other.to_html()),
        }
    }

    /// Move queued boundaries into the in-flight set.
    fn start(&mut self, in_flight: &mut FuturesUnordered<BoxFuture<'static, Settled>>) {
        in_flight.extend(self.pending.drain(..).map(|(id, content)| settle(id, content)));
    }
}

/// Resolve one boundary, turning a panic into a component error.
fn settle(id: usize, content: DeferredContent) -> BoxFuture<'static, Settled> {
    Box::pin(async move {
        let result = AssertUnwindSafe(content)
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(RenderError::Component(panic_message(panic.as_ref()))));
        (id, result)
    })
}

async fn stream_boundaries(mut boundaries: Boundaries, sink: RenderSink, options: RenderOptions) {
    let mut swap_defined = false;
    let mut in_flight = FuturesUnordered::new();
    boundaries.start(&mut in_flight);

    while !in_flight.is_empty() {
        let (id, resolved) = tokio::select! {
            Some(settled) = in_flight.next() => settled,
            _ = options.signal.aborted() => {
                tracing::debug!("Render aborted, dropping pending boundaries");
                break;
            }
        };

        let node = match resolved {
            Ok(node) => node,
            Err(RenderError::Aborted) => {
                tracing::debug!(boundary = id, "Boundary aborted, keeping fallback");
                continue;
            }
            Err(e) => {
                let err = match e {
                    RenderError::Component(message) => RenderError::Boundary { boundary: id, message },
                    other => other,
                };
                (options.on_error)(&err);
                continue;
            }
        };

        let mut chunk = String::new();
        if !swap_defined {
            chunk.push_str(&script(&options.nonce, SWAP_FUNCTION));
            swap_defined = true;
        }
        chunk.push_str(&format!("<div hidden id=\"S:{id}\">"));
        boundaries.write(node, &mut chunk);
        chunk.push_str("</div>");
        chunk.push_str(&script(&options.nonce, &format!("$RC(\"B:{id}\",\"S:{id}\")")));

        if !sink.send(chunk) {
            tracing::debug!(boundary = id, "Body receiver dropped, stopping render");
            break;
        }
        boundaries.start(&mut in_flight);
    }

    sink.finish();
}

fn script(nonce: &str, body: &str) -> String {
    let mut el = Element::new("script");
    if !nonce.is_empty() {
        el.set_attr("nonce", nonce);
    }
    Node::from(el.child(Node::raw(body))).to_html()
}
