//! Paragraph parser.

use scraper::ElementRef;

use hunter_core::{clean_text, ContentType, ParseRecord};

use super::ParseContext;

pub(super) fn parse_paragraph(element: &ElementRef, ctx: &ParseContext) -> ParseRecord {
    let text = clean_text(&ctx.render_inline(element));
    ParseRecord::new(ContentType::Paragraph, text)
}
