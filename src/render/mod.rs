//! Streaming HTML rendering.
//!
//! # Data Flow
//! ```text
//! root Node (already wrapped by NonceProvider)
//!     → StreamingRenderer::render
//!         → shell chunk sent immediately
//!         → spawned task resolves Deferred boundaries, streams each chunk
//!         → all_ready fires when the last boundary settles
//!     → RenderStream → response Body
//! ```
//!
//! # Design Decisions
//! - Body chunks travel over an unbounded channel, so awaiting `all_ready`
//!   before the body is polled cannot stall the producer
//! - A failed or panicking boundary reports through `on_error` and keeps
//!   its fallback
//! - Abort stops pending boundaries; the shell is never withdrawn

pub mod abort;
pub mod html;

use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use futures_util::future::BoxFuture;
use tokio::sync::{mpsc, watch};

use crate::markup::Node;

pub use abort::{AbortController, AbortSignal};
pub use html::HtmlStreamRenderer;

/// Errors raised while producing markup.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RenderError {
    #[error("component failed: {0}")]
    Component(String),

    #[error("deferred boundary {boundary} failed: {message}")]
    Boundary { boundary: usize, message: String },

    #[error("render aborted")]
    Aborted,
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

/// Callback invoked for every render error. Rendering continues afterwards.
pub type ErrorCallback = Arc<dyn Fn(&RenderError) + Send + Sync>;

/// Options for a single render.
#[derive(Clone)]
pub struct RenderOptions {
    pub nonce: String,
    pub signal: AbortSignal,
    pub on_error: ErrorCallback,
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("nonce", &self.nonce)
            .field("aborted", &self.signal.is_aborted())
            .finish_non_exhaustive()
    }
}

/// Renders a tree into an incremental byte stream.
pub trait StreamingRenderer: Send + Sync {
    fn render(&self, root: Node, options: RenderOptions) -> BoxFuture<'static, RenderStream>;
}

/// Producer half of a `RenderStream`.
pub struct RenderSink {
    chunks: mpsc::UnboundedSender<Bytes>,
    ready: watch::Sender<bool>,
}

impl RenderSink {
    /// Queue a chunk. Returns false once the consumer is gone.
    pub fn send(&self, chunk: impl Into<Bytes>) -> bool {
        self.chunks.send(chunk.into()).is_ok()
    }

    /// Mark all content ready and close the stream.
    pub fn finish(self) {
        let _ = self.ready.send(true);
    }
}

/// Rendered body plus a completion signal.
pub struct RenderStream {
    chunks: mpsc::UnboundedReceiver<Bytes>,
    ready: watch::Receiver<bool>,
}

impl RenderStream {
    pub fn channel() -> (RenderSink, RenderStream) {
        let (chunks_tx, chunks_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = watch::channel(false);
        (
            RenderSink {
                chunks: chunks_tx,
                ready: ready_tx,
            },
            RenderStream {
                chunks: chunks_rx,
                ready: ready_rx,
            },
        )
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Wait until every deferred boundary has settled.
    pub async fn all_ready(&mut self) {
        // A dropped sink means the producer is done as well.
        let _ = self.ready.wait_for(|ready| *ready).await;
    }

    /// Next body chunk, or `None` once the producer is done.
    pub async fn next_chunk(&mut self) -> Option<Bytes> {
        self.chunks.recv().await
    }

    /// Drain the stream into a string. Waits for the producer to finish.
    pub async fn collect_string(mut self) -> String {
        let mut out = Vec::new();
        while let Some(chunk) = self.next_chunk().await {
            out.extend_from_slice(&chunk);
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Convert into a response body. `guard` lives as long as the body, so
    /// dropping the body (client gone) drops the guard.
    pub fn into_body<G: Send + 'static>(self, guard: G) -> Body {
        let stream = futures_util::stream::unfold((self.chunks, guard), |(mut rx, guard)| async move {
            rx.recv()
                .await
                .map(|chunk| (Ok::<_, Infallible>(chunk), (rx, guard)))
        });
        Body::from_stream(stream)
    }
}
