//! Markup tree shared by the UI components and the streaming renderer.
//!
//! # Data Flow
//! ```text
//! ui components (carousel, image, app shell)
//!     → Node tree
//!     → csp::NonceProvider (stamps nonce on <script>)
//!     → render::HtmlStreamRenderer (shell + deferred chunks)
//! ```
//!
//! # Design Decisions
//! - Attributes keep insertion order so output is deterministic
//! - Text and attribute values are escaped on output, `Raw` is not
//! - `Deferred` is the only async node; everything else is plain data

use std::fmt;

use futures_util::future::BoxFuture;

use crate::render::RenderError;

/// Content resolved after the shell has been flushed.
pub type DeferredContent = BoxFuture<'static, Result<Node, RenderError>>;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["area", "br", "hr", "img", "input", "link", "meta", "source"];

/// A node in the markup tree.
pub enum Node {
    Element(Element),
    /// Text content, escaped on output.
    Text(String),
    /// Trusted markup written verbatim.
    Raw(String),
    Fragment(Vec<Node>),
    /// A streaming boundary: `fallback` goes into the shell, `content` is
    /// streamed once it resolves.
    Deferred {
        fallback: Box<Node>,
        content: DeferredContent,
    },
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn raw(value: impl Into<String>) -> Self {
        Node::Raw(value.into())
    }

    pub fn deferred(fallback: Node, content: DeferredContent) -> Self {
        Node::Deferred {
            fallback: Box::new(fallback),
            content,
        }
    }

    /// Serialize the tree synchronously. Deferred boundaries render their fallback.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => {
                el.write_open_tag(out);
                if !el.is_void() {
                    for child in &el.children {
                        child.write_html(out);
                    }
                    el.write_close_tag(out);
                }
            }
            Node::Text(text) => escape_text(text, out),
            Node::Raw(html) => out.push_str(html),
            Node::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            Node::Deferred { fallback, .. } => fallback.write_html(out),
        }
    }

    /// Count elements matching `pred`, ignoring deferred content.
    pub fn count_elements(&self, pred: &dyn Fn(&Element) -> bool) -> usize {
        match self {
            Node::Element(el) => {
                usize::from(pred(el))
                    + el.children.iter().map(|c| c.count_elements(pred)).sum::<usize>()
            }
            Node::Fragment(children) => children.iter().map(|c| c.count_elements(pred)).sum(),
            Node::Deferred { fallback, .. } => fallback.count_elements(pred),
            Node::Text(_) | Node::Raw(_) => 0,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(el) => f.debug_tuple("Element").field(el).finish(),
            Node::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Node::Raw(r) => f.debug_tuple("Raw").field(r).finish(),
            Node::Fragment(c) => f.debug_tuple("Fragment").field(c).finish(),
            Node::Deferred { fallback, .. } => f
                .debug_struct("Deferred")
                .field("fallback", fallback)
                .finish_non_exhaustive(),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An HTML element with ordered attributes.
#[derive(Debug)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an existing value with the same name.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// True if the whitespace-separated `class` attribute contains `name`.
    pub fn has_class(&self, name: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|part| part == name))
            .unwrap_or(false)
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    pub(crate) fn write_open_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_attr(value, out);
            out.push('"');
        }
        out.push('>');
    }

    pub(crate) fn write_close_tag(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

pub(crate) fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

pub(crate) fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
