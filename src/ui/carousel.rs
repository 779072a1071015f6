//! Image carousel.
//!
//! Markup follows the Bootstrap carousel contract: the controls reference the
//! slide container by id, and exactly one slide carries `active`.

use crate::markup::{Element, Node};
use crate::ui::image::{ImageComponent, ImageDescriptor, ImageProps};

/// Id the previous/next controls target.
pub const CAROUSEL_ID: &str = "carouselExampleControls";

const SLIDE_IMAGE_CLASS: &str = "d-block w-100";
const SLIDE_IMAGE_SIZES: &str = "(min-width: 45em) 20vw, 50vw";

/// Render a carousel for `images`. Returns `None` for an empty list.
///
/// Descriptors are not validated; an empty `src` reaches `image` as is.
pub fn render_carousel(images: &[ImageDescriptor], image: &dyn ImageComponent) -> Option<Node> {
    if images.is_empty() {
        return None;
    }

    let slides = images.iter().enumerate().map(|(index, desc)| {
        let class = if index == 0 {
            "carousel-item active"
        } else {
            "carousel-item"
        };
        Node::from(Element::new("div").class(class).child(image.render(ImageProps {
            src: &desc.src,
            alt: &desc.alt,
            class: SLIDE_IMAGE_CLASS,
            sizes: SLIDE_IMAGE_SIZES,
        })))
    });

    let carousel = Element::new("div")
        .id(CAROUSEL_ID)
        .class("carousel slide")
        .attr("data-bs-ride", "carousel")
        .child(Element::new("div").class("carousel-inner").children(slides))
        .child(control("prev", "Previous"))
        .child(control("next", "Next"));

    Some(
        Element::new("div")
            .class("container-fluid")
            .child(
                Element::new("div")
                    .class("row")
                    .child(Element::new("div").class("col-md-12").child(carousel)),
            )
            .into(),
    )
}

fn control(direction: &str, label: &str) -> Element {
    Element::new("button")
        .class(format!("carousel-control-{direction}"))
        .attr("type", "button")
        .attr("data-bs-target", format!("#{CAROUSEL_ID}"))
        .attr("data-bs-slide", direction)
        .child(
            Element::new("span")
                .class(format!("carousel-control-{direction}-icon"))
                .attr("aria-hidden", "true"),
        )
        .child(Element::new("span").class("visually-hidden").child(Node::text(label)))
}
