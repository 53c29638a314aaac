//! Heading parser.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Node};

use hunter_core::{collapse_whitespace, ContentType, ParseRecord};

use super::ParseContext;
use crate::element::ElementExt;
use crate::utilities::heading_level;

/// Permalink glyphs documentation generators append to headings
static PERMALINK_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[\s\x{200B}]*[¶🔗\x{200B}]|\s+#+)+\s*$").expect("permalink pattern is valid")
});

/// Anchor that only carries a permalink symbol (`<a href="#install">#</a>`)
fn is_permalink_anchor(element: &ElementRef) -> bool {
    element.tag_name() == "a"
        && element
            .clean_attr("href")
            .map(|href| href.starts_with('#'))
            .unwrap_or(false)
        && !element.text().any(|t| t.chars().any(char::is_alphanumeric))
}

fn collect_text(element: &ElementRef, ctx: &ParseContext, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    if !is_permalink_anchor(&child_element) && !ctx.is_skipped(&child_element) {
                        collect_text(&child_element, ctx, out);
                    }
                }
            }
            _ => {}
        }
    }
}

pub(super) fn parse_heading(element: &ElementRef, ctx: &ParseContext) -> ParseRecord {
    let Some(level) = heading_level(element.tag_name()) else {
        return ParseRecord::empty(ContentType::Heading);
    };

    let mut text = String::new();
    collect_text(element, ctx, &mut text);
    let text = collapse_whitespace(&text);
    let text = PERMALINK_TAIL.replace(&text, "");

    ParseRecord::new(ContentType::Heading, text.trim()).with_level(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use hunter_core::FormatOptions;
    use scraper::Html;

    fn parse(html: &str) -> ParseRecord {
        let document = Html::parse_fragment(html);
        let element = document.root_element().element_children().next().unwrap();
        let dispatcher = Dispatcher::new();
        let options = FormatOptions::default();
        let ctx = ParseContext::new(None, &options, &dispatcher);
        parse_heading(&element, &ctx)
    }

    #[test]
    fn test_level_and_text() {
        let record = parse("<h3>  Getting\n   started </h3>");
        assert_eq!(record.level(), 3);
        assert_eq!(record.raw_text(), "Getting started");
    }

    #[test]
    fn test_permalink_glyphs_are_stripped() {
        assert_eq!(parse("<h2>Install¶</h2>").raw_text(), "Install");
        assert_eq!(parse("<h2>Install #</h2>").raw_text(), "Install");
        assert_eq!(
            parse(r##"<h2 id="x">Install<a href="#x" class="anchor">#</a></h2>"##).raw_text(),
            "Install"
        );
        assert_eq!(parse("<h2>Usage 🔗</h2>").raw_text(), "Usage");
    }

    #[test]
    fn test_meaningful_hash_is_kept() {
        assert_eq!(parse("<h2>Why C#</h2>").raw_text(), "Why C#");
        assert_eq!(
            parse(r##"<h2><a href="#api">API reference</a></h2>"##).raw_text(),
            "API reference"
        );
    }
}
