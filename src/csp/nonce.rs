//! Per-request nonce and the markup wrapper that applies it.

use std::sync::Arc;

use rand::RngCore;

use crate::markup::Node;
use crate::render::RenderError;

/// 16 random bytes, hex encoded.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Applies the request nonce to every inline `<script>` in a tree,
/// including scripts inside deferred content once it resolves.
#[derive(Debug, Clone)]
pub struct NonceProvider {
    nonce: Arc<str>,
}

impl NonceProvider {
    pub fn new(nonce: impl Into<Arc<str>>) -> Self {
        Self {
            nonce: nonce.into(),
        }
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn wrap(&self, mut root: Node) -> Node {
        stamp(&mut root, &self.nonce);
        root
    }
}

fn stamp(node: &mut Node, nonce: &Arc<str>) {
    match node {
        Node::Element(el) => {
            if el.tag.eq_ignore_ascii_case("script") {
                el.set_attr("nonce", nonce.to_string());
            }
            for child in &mut el.children {
                stamp(child, nonce);
            }
        }
        Node::Fragment(children) => {
            for child in children {
                stamp(child, nonce);
            }
        }
        Node::Deferred { fallback, content } => {
            stamp(fallback, nonce);
            let inner = std::mem::replace(content, Box::pin(futures_util::future::pending::<Result<Node, RenderError>>()));
            let nonce = nonce.clone();
            *content = Box::pin(async move {
                let mut resolved = inner.await?;
                stamp(&mut resolved, &nonce);
                Ok::<_, RenderError>(resolved)
            });
        }
        Node::Text(_) | Node::Raw(_) => {}
    }
}
