//! Parser dispatch.
//!
//! Walks the children of the content root in document order, drops skipped
//! elements, descends into generic containers that hold block content, and
//! hands every other element to the parser registered for its content type.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Node, Selector};
use url::Url;

use hunter_core::{clean_text, ContentType, FormatOptions, ParseRecord};

use crate::classify::{classify, is_code_container, Classification};
use crate::element::ElementExt;
use crate::parsers::{push_text, render_element, Filter, ParseContext, Parsers};
use crate::utilities::{has_skip_word, heading_level, is_block, is_container, is_skip_tag};

static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("hardcoded heading selector is valid")
});

/// Containers nested deeper than this are parsed as a whole
const MAX_CONTAINER_DEPTH: usize = 100;

/// Runs parsers over the content root
pub struct Dispatcher {
    parsers: Parsers,
    skip_filters: Vec<Filter>,
}

impl Dispatcher {
    /// Create a dispatcher with the built-in parsers and skip list
    pub fn new() -> Self {
        Self {
            parsers: Parsers::new(),
            skip_filters: Vec::new(),
        }
    }

    /// The parser registry
    pub fn parsers(&self) -> &Parsers {
        &self.parsers
    }

    /// Replace the parser for a content type
    pub fn set_parser<F>(&mut self, content_type: ContentType, parser: F)
    where
        F: Fn(&ElementRef, &ParseContext) -> ParseRecord + Send + Sync + 'static,
    {
        self.parsers.set(content_type, parser);
    }

    /// Drop elements matching the filter, subtree included
    pub fn skip(&mut self, filter: Filter) {
        self.skip_filters.push(filter);
    }

    /// Check if an element is dropped before classification.
    ///
    /// Skip-list tags and custom filters always apply. `class`/`id` words
    /// are not applied to headings and code, and a `header` is only
    /// dropped when it carries no heading.
    pub fn is_skipped(&self, element: &ElementRef) -> bool {
        let tag = element.tag_name();

        if is_skip_tag(tag) || self.skip_filters.iter().any(|f| f.matches(element)) {
            return true;
        }

        if tag == "header" && element.select(&HEADING_SELECTOR).next().is_none() {
            return true;
        }

        let exempt = heading_level(tag).is_some() || matches!(tag, "pre" | "code");
        !exempt && has_skip_word(&element.marker_words())
    }

    /// Parse the content root into records, in document order.
    ///
    /// Records with no text and no children are dropped.
    pub fn dispatch(
        &self,
        root: &ElementRef,
        base_url: Option<&Url>,
        options: &FormatOptions,
    ) -> Vec<ParseRecord> {
        let ctx = ParseContext::new(base_url, options, self);
        let mut records = Vec::new();
        self.walk(root, &ctx, 0, &mut records);

        let total = records.len();
        records.retain(|record| !record.is_blank());
        tracing::debug!(
            records = records.len(),
            dropped = total - records.len(),
            "dispatched content root"
        );
        records
    }

    fn walk(
        &self,
        container: &ElementRef,
        ctx: &ParseContext,
        depth: usize,
        records: &mut Vec<ParseRecord>,
    ) {
        // inline runs sitting directly in a container become paragraphs
        let has_loose_text = container
            .children()
            .any(|c| matches!(c.value(), Node::Text(t) if !t.trim().is_empty()));
        let mut stray = String::new();

        for child in container.children() {
            match child.value() {
                Node::Text(text) => push_text(&mut stray, text),
                Node::Element(_) => {
                    let Some(element) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if self.is_skipped(&element) {
                        continue;
                    }

                    let tag = element.tag_name();
                    let is_standalone = (matches!(tag, "a" | "img") && !has_loose_text)
                        || is_code_container(&element);
                    if !is_block(tag) && !is_standalone && !is_container_with_blocks(&element) {
                        render_element(&element, ctx, &mut stray);
                        continue;
                    }

                    flush(&mut stray, records);
                    self.visit(&element, ctx, depth, records);
                }
                _ => {}
            }
        }

        flush(&mut stray, records);
    }

    fn visit(
        &self,
        element: &ElementRef,
        ctx: &ParseContext,
        depth: usize,
        records: &mut Vec<ParseRecord>,
    ) {
        let classification = classify(element);

        if classification != Classification::CodeBlock
            && is_container_with_blocks(element)
            && depth < MAX_CONTAINER_DEPTH
        {
            self.walk(element, ctx, depth + 1, records);
            return;
        }

        if depth >= MAX_CONTAINER_DEPTH {
            tracing::debug!(depth, "container nesting limit reached");
        }

        match classification.content_type() {
            Some(content_type) => records.push(self.parsers.parse(content_type, element, ctx)),
            None => tracing::trace!(tag = element.tag_name(), "unsupported element dropped"),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn is_container_with_blocks(element: &ElementRef) -> bool {
    is_container(element.tag_name())
        && element
            .element_children()
            .any(|child| is_block(child.tag_name()) || child.tag_name() == "img")
}

fn flush(stray: &mut String, records: &mut Vec<ParseRecord>) {
    let text = clean_text(stray);
    if !text.is_empty() {
        records.push(ParseRecord::new(ContentType::Paragraph, text));
    }
    stray.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_document;
    use crate::locate::locate_content_root;
    use hunter_core::keys;
    use pretty_assertions::assert_eq;

    fn dispatch_with(dispatcher: &Dispatcher, html: &str) -> Vec<(ContentType, String)> {
        let document = parse_document(html);
        let root = locate_content_root(&document).unwrap();
        dispatcher
            .dispatch(&root.element, None, &FormatOptions::default())
            .iter()
            .map(|r| (r.content_type(), r.raw_text().to_string()))
            .collect()
    }

    fn dispatch(html: &str) -> Vec<(ContentType, String)> {
        dispatch_with(&Dispatcher::new(), html)
    }

    #[test]
    fn test_document_order() {
        let records = dispatch(
            r#"<main><h1>Title</h1><p>Intro</p><ul><li>a</li></ul><pre>x = 1</pre><a href="/n">Next</a></main>"#,
        );
        let types: Vec<_> = records.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            types,
            vec![
                ContentType::Heading,
                ContentType::Paragraph,
                ContentType::List,
                ContentType::CodeBlock,
                ContentType::Link,
            ]
        );
    }

    #[test]
    fn test_containers_are_descended() {
        let records = dispatch(
            r#"<main><section><h2>Part</h2><div><p>One</p><p>Two</p></div></section></main>"#,
        );
        assert_eq!(
            records,
            vec![
                (ContentType::Heading, "Part".to_string()),
                (ContentType::Paragraph, "One".to_string()),
                (ContentType::Paragraph, "Two".to_string()),
            ]
        );
    }

    #[test]
    fn test_stray_text_becomes_paragraph() {
        let records = dispatch(
            r#"<main>Loose <b>text</b> with <a href="/l">a link</a><p>After</p></main>"#,
        );
        assert_eq!(
            records,
            vec![
                (ContentType::Paragraph, "Loose **text** with [a link](/l)".to_string()),
                (ContentType::Paragraph, "After".to_string()),
            ]
        );
    }

    #[test]
    fn test_unsupported_elements_never_appear() {
        let records = dispatch(
            r#"<main>
                <nav><p>Home</p></nav>
                <div class="sidebar"><p>Links</p></div>
                <script>var secret = 1;</script>
                <p>Body</p>
                <footer><p>Copyright</p></footer>
            </main>"#,
        );
        assert_eq!(records, vec![(ContentType::Paragraph, "Body".to_string())]);
    }

    #[test]
    fn test_header_with_heading_is_kept() {
        let records = dispatch(
            r#"<article><header><h1>Post</h1></header><header><p>Site</p></header><p>Text</p></article>"#,
        );
        assert_eq!(
            records,
            vec![
                (ContentType::Heading, "Post".to_string()),
                (ContentType::Paragraph, "Text".to_string()),
            ]
        );
    }

    #[test]
    fn test_highlighter_wrapper_is_not_descended() {
        let document = parse_document(
            r#"<main><div class="highlight"><pre><code class="language-rust">fn main() {}</code></pre></div></main>"#,
        );
        let root = locate_content_root(&document).unwrap();
        let records = Dispatcher::new().dispatch(&root.element, None, &FormatOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content_type(), ContentType::CodeBlock);
        assert_eq!(records[0].meta_str(keys::LANGUAGE_HINT), Some("rust"));
    }

    #[test]
    fn test_multiline_code_outside_pre_is_a_block() {
        let records = dispatch("<main><h1>T</h1><code>def f():\n    pass</code></main>");
        assert_eq!(
            records,
            vec![
                (ContentType::Heading, "T".to_string()),
                (ContentType::CodeBlock, "def f():\n    pass".to_string()),
            ]
        );

        // single-line code stays inline
        let records = dispatch("<main>Run <code>make</code> first</main>");
        assert_eq!(
            records,
            vec![(ContentType::Paragraph, "Run `make` first".to_string())]
        );
    }

    #[test]
    fn test_custom_skip_filter() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.skip(Filter::marker_word("promo"));
        dispatcher.skip(Filter::tag("table"));
        let records = dispatch_with(
            &dispatcher,
            r#"<main><div class="promo-box"><p>Sale</p></div><table><tr><td>x</td></tr></table><p>Kept</p></main>"#,
        );
        assert_eq!(records, vec![(ContentType::Paragraph, "Kept".to_string())]);
    }

    #[test]
    fn test_replaced_parser() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_parser(ContentType::Heading, |el, _| {
            ParseRecord::new(ContentType::Heading, el.text_content().to_uppercase()).with_level(1)
        });
        let records = dispatch_with(&dispatcher, "<main><h3>quiet</h3></main>");
        assert_eq!(records, vec![(ContentType::Heading, "QUIET".to_string())]);
    }

    #[test]
    fn test_empty_elements_are_filtered() {
        let records = dispatch(r#"<main><p> </p><h2></h2><a href="/x"></a><p>Only</p></main>"#);
        assert_eq!(
            records,
            vec![
                (ContentType::Link, "/x".to_string()),
                (ContentType::Paragraph, "Only".to_string()),
            ]
        );
    }
}
