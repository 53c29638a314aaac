//! Link and image parsers.

use scraper::ElementRef;

use hunter_core::{collapse_whitespace, keys, ContentType, ParseRecord};

use super::ParseContext;
use crate::classify::sole_image;
use crate::element::ElementExt;

fn image_record(image: &ElementRef, ctx: &ParseContext) -> ParseRecord {
    let src = image
        .clean_attr("src")
        .or_else(|| image.clean_attr("data-src"))
        .map(|src| ctx.resolve_url(src))
        .unwrap_or_default();
    let alt = image.clean_attr("alt").map(collapse_whitespace).unwrap_or_default();

    if src.is_empty() && alt.is_empty() {
        return ParseRecord::empty(ContentType::Image);
    }

    let text = if alt.is_empty() { src.clone() } else { alt.clone() };
    let mut record = ParseRecord::new(ContentType::Image, text)
        .with_meta(keys::HREF, src)
        .with_meta(keys::ALT, alt);

    if let Some(title) = image.clean_attr("title") {
        record = record.with_meta(keys::TITLE, title);
    }
    record
}

pub(super) fn parse_image(element: &ElementRef, ctx: &ParseContext) -> ParseRecord {
    match element.tag_name() {
        "img" => image_record(element, ctx),
        _ => match sole_image(element) {
            Some(image) => image_record(&image, ctx),
            None => ParseRecord::empty(ContentType::Image),
        },
    }
}

pub(super) fn parse_link(element: &ElementRef, ctx: &ParseContext) -> ParseRecord {
    if let Some(image) = sole_image(element) {
        return image_record(&image, ctx);
    }

    let href = element
        .clean_attr("href")
        .map(|href| ctx.resolve_url(href))
        .unwrap_or_default();
    let text = collapse_whitespace(&element.text_content());

    if text.is_empty() && href.is_empty() {
        return ParseRecord::empty(ContentType::Link);
    }

    let visible = if text.is_empty() { href.clone() } else { text };
    let mut record = ParseRecord::new(ContentType::Link, visible).with_meta(keys::HREF, href);

    if let Some(title) = element.clean_attr("title") {
        record = record.with_meta(keys::TITLE, title);
    }
    record
}
