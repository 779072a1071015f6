//! Storefront UI components.
//!
//! Components are plain functions from data to a `Node` tree. They hold no
//! state and know nothing about the request that renders them.

pub mod app;
pub mod carousel;
pub mod image;

pub use app::{HomePage, RouteContext, StorefrontApp};
pub use carousel::render_carousel;
pub use image::{ImageComponent, ImageDescriptor, ImageProps, LazyImage};
