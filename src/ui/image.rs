//! Image descriptors and the image component seam.

use serde::{Deserialize, Serialize};

use crate::markup::{Element, Node};

/// An image to show, identified only by its position in a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageDescriptor {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

impl ImageDescriptor {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// Props handed to an image component.
#[derive(Debug, Clone, Copy)]
pub struct ImageProps<'a> {
    pub src: &'a str,
    pub alt: &'a str,
    pub class: &'a str,
    pub sizes: &'a str,
}

/// Produces the markup for a single image.
///
/// Optimization (srcset generation, CDN transforms) belongs to implementors.
pub trait ImageComponent: Send + Sync {
    fn render(&self, props: ImageProps<'_>) -> Node;
}

/// Plain `<img>` with native lazy loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyImage;

impl ImageComponent for LazyImage {
    fn render(&self, props: ImageProps<'_>) -> Node {
        Element::new("img")
            .attr("src", props.src)
            .attr("alt", props.alt)
            .class(props.class)
            .attr("sizes", props.sizes)
            .attr("loading", "lazy")
            .attr("decoding", "async")
            .into()
    }
}
