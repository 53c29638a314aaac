//! Content-type classification.
//!
//! Every element maps to exactly one [`Classification`]. The checks run in
//! a fixed priority order so the result is deterministic even for elements
//! that carry conflicting signals (a heading inside a link, a list with a
//! highlighter class, ...).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Node, Selector};

use hunter_core::ContentType;

use crate::element::ElementExt;
use crate::utilities::{has_code_marker, has_skip_word, heading_level, is_skip_tag};

static CODE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("pre, code").expect("hardcoded selector 'pre, code' is valid"));

/// Result of classifying one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Heading,
    CodeBlock,
    List,
    Link,
    Image,
    Paragraph,
    /// Excluded from output
    Unsupported,
}

impl Classification {
    /// Content type for supported classifications
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            Classification::Heading => Some(ContentType::Heading),
            Classification::CodeBlock => Some(ContentType::CodeBlock),
            Classification::List => Some(ContentType::List),
            Classification::Link => Some(ContentType::Link),
            Classification::Image => Some(ContentType::Image),
            Classification::Paragraph => Some(ContentType::Paragraph),
            Classification::Unsupported => None,
        }
    }
}

/// The single image an anchor wraps, if the anchor holds nothing else
pub(crate) fn sole_image<'a>(anchor: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut image = None;

    for child in anchor.children() {
        match child.value() {
            Node::Text(text) if text.trim().is_empty() => {}
            Node::Text(_) => return None,
            Node::Element(_) => {
                let element = ElementRef::wrap(child)?;
                let found = if element.tag_name() == "img" {
                    element
                } else {
                    // <picture>, <span> and friends wrapping one image
                    sole_image(&element)?
                };
                if image.replace(found).is_some() {
                    return None;
                }
            }
            _ => {}
        }
    }

    image
}

pub(crate) fn is_code_container(element: &ElementRef) -> bool {
    match element.tag_name() {
        "pre" => true,
        // a block-level <code> only counts when it spans lines
        "code" => element.text_content().trim().contains('\n'),
        _ => {
            let class = element.value().attr("class").unwrap_or("");
            has_code_marker(class) && element.select(&CODE_SELECTOR).next().is_some()
        }
    }
}

/// Classify one element.
pub fn classify(element: &ElementRef) -> Classification {
    let tag = element.tag_name();

    if heading_level(tag).is_some() {
        return Classification::Heading;
    }

    if is_code_container(element) {
        return Classification::CodeBlock;
    }

    if tag == "ul" || tag == "ol" {
        return Classification::List;
    }

    if tag == "img" {
        return Classification::Image;
    }

    if tag == "a" {
        if sole_image(element).is_some() {
            return Classification::Image;
        }
        return Classification::Link;
    }

    if is_skip_tag(tag) || has_skip_word(&element.marker_words()) {
        return Classification::Unsupported;
    }

    if element.has_text() {
        Classification::Paragraph
    } else {
        Classification::Unsupported
    }
}
