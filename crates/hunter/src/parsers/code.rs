//! Code block parser.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use hunter_core::{keys, language_from_class, normalize_language, trim_blank_lines};
use hunter_core::{ContentType, ParseRecord};

use super::ParseContext;
use crate::element::ElementExt;

static PRE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("pre").expect("hardcoded selector 'pre' is valid"));

static CODE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("pre, code").expect("hardcoded selector 'pre, code' is valid"));

/// Class words of line-number gutters emitted next to highlighted code
const GUTTER_WORDS: &[&str] = &["gutter", "lineno", "linenos", "linenodiv", "numbers"];

fn is_gutter(element: &ElementRef) -> bool {
    let own = element.marker_words();
    let parent = element
        .parent()
        .and_then(ElementRef::wrap)
        .map(|p| p.marker_words())
        .unwrap_or_default();

    own.iter()
        .chain(parent.iter())
        .any(|w| GUTTER_WORDS.contains(&w.as_str()))
}

/// The element whose text is the code: the element itself for `pre` and
/// `code`, else the first `pre` inside a highlighter wrapper
fn code_source<'a>(element: &ElementRef<'a>) -> ElementRef<'a> {
    match element.tag_name() {
        "pre" | "code" => *element,
        _ => element
            .select(&PRE_SELECTOR)
            .find(|pre| !is_gutter(pre))
            .unwrap_or(*element),
    }
}

fn annotation(element: &ElementRef) -> Option<String> {
    element
        .value()
        .attr("class")
        .and_then(language_from_class)
        .or_else(|| {
            element
                .clean_attr("data-lang")
                .or_else(|| element.clean_attr("data-language"))
                .and_then(normalize_language)
        })
}

/// Explicit language annotation on the element or any `pre`/`code` inside it
fn language_hint(element: &ElementRef) -> Option<String> {
    annotation(element).or_else(|| element.select(&CODE_SELECTOR).find_map(|el| annotation(&el)))
}

pub(super) fn parse_code_block(element: &ElementRef, _: &ParseContext) -> ParseRecord {
    let source = code_source(element);
    let code = trim_blank_lines(&source.preformatted_text());

    let record = ParseRecord::new(ContentType::CodeBlock, code);
    match language_hint(element) {
        Some(language) => record.with_meta(keys::LANGUAGE_HINT, language),
        None => record,
    }
}
