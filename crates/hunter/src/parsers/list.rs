//! List parser.
//!
//! Each `li` becomes a Paragraph child holding the item's inline text,
//! followed by child records for the blocks nested in the item: lists
//! (parsed recursively, one level deeper) and code blocks.

use scraper::{ElementRef, Node};

use hunter_core::{clean_text, keys, ContentType, ParseRecord};

use super::inline::{push_text, render_element};
use super::ParseContext;
use crate::classify::{classify, Classification};
use crate::element::ElementExt;

fn is_list(element: &ElementRef) -> bool {
    matches!(element.tag_name(), "ul" | "ol")
}

/// Split an item into its inline text and the blocks nested in it
fn split_item<'a>(
    item: &ElementRef<'a>,
    ctx: &ParseContext,
    text: &mut String,
    blocks: &mut Vec<ElementRef<'a>>,
) {
    for child in item.children() {
        match child.value() {
            Node::Text(t) => push_text(text, t),
            Node::Element(_) => {
                let Some(element) = ElementRef::wrap(child) else {
                    continue;
                };
                if ctx.is_skipped(&element) {
                    continue;
                }
                if is_list(&element) || classify(&element) == Classification::CodeBlock {
                    blocks.push(element);
                } else if matches!(element.tag_name(), "div" | "p" | "section" | "details") {
                    // block wrappers inside items may hide nested lists
                    split_item(&element, ctx, text, blocks);
                    text.push('\n');
                } else {
                    render_element(&element, ctx, text);
                }
            }
            _ => {}
        }
    }
}

fn parse_list_at(element: &ElementRef, ctx: &ParseContext, depth: usize) -> ParseRecord {
    let ordered = element.tag_name() == "ol";
    let mut children = Vec::new();
    let mut lines = Vec::new();

    for child in element.element_children() {
        if ctx.is_skipped(&child) {
            continue;
        }

        // a list nested directly in a list belongs to the previous item
        if is_list(&child) {
            children.push(parse_list_at(&child, ctx, depth + 1));
            continue;
        }

        let mut text = String::new();
        let mut blocks = Vec::new();
        split_item(&child, ctx, &mut text, &mut blocks);

        let text = clean_text(&text);
        lines.push(text.clone());
        children.push(ParseRecord::new(ContentType::Paragraph, text));

        for block in blocks {
            if is_list(&block) {
                children.push(parse_list_at(&block, ctx, depth + 1));
            } else {
                children.push(ctx.parse(ContentType::CodeBlock, &block));
            }
        }
    }

    let mut record = ParseRecord::new(ContentType::List, lines.join("\n"))
        .with_level(depth)
        .with_meta(keys::ORDERED, ordered);

    if ordered {
        if let Some(start) = element
            .clean_attr("start")
            .filter(|s| s.parse::<u64>().is_ok())
        {
            record = record.with_meta(keys::START, start);
        }
    }

    record.with_children(children)
}

pub(super) fn parse_list(element: &ElementRef, ctx: &ParseContext) -> ParseRecord {
    parse_list_at(element, ctx, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use hunter_core::{format_record, FormatOptions};
    use pretty_assertions::assert_eq;
    use scraper::Html;

    fn parse(html: &str) -> ParseRecord {
        let document = Html::parse_fragment(html);
        let element = document.root_element().element_children().next().unwrap();
        let dispatcher = Dispatcher::new();
        let options = FormatOptions::default();
        let ctx = ParseContext::new(None, &options, &dispatcher);
        parse_list(&element, &ctx)
    }

    fn markdown(html: &str) -> String {
        format_record(&parse(html), &FormatOptions::default())
    }

    #[test]
    fn test_nested_structure() {
        let record = parse("<ul><li>A</li><li>B<ul><li>C</li></ul></li></ul>");
        assert!(!record.meta_flag(keys::ORDERED));
        assert_eq!(record.level(), 0);
        assert_eq!(record.raw_text(), "A\nB");

        let children = record.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].raw_text(), "A");
        assert_eq!(children[1].raw_text(), "B");
        assert_eq!(children[2].content_type(), ContentType::List);
        assert_eq!(children[2].level(), 1);
        assert_eq!(children[2].children()[0].raw_text(), "C");
    }

    #[test]
    fn test_nested_markdown() {
        assert_eq!(
            markdown("<ul><li>A</li><li>B<ul><li>C</li></ul></li></ul>"),
            "- A\n- B\n  - C\n\n"
        );
    }

    #[test]
    fn test_ordered_inside_unordered_stays_separate() {
        assert_eq!(
            markdown("<ul><li>Steps<ol start=\"2\"><li>two</li><li>three</li></ol></li><li>End</li></ul>"),
            "- Steps\n  2. two\n  3. three\n- End\n\n"
        );
    }

    #[test]
    fn test_inline_markup_in_items() {
        assert_eq!(
            markdown(r#"<ol><li>Run <code>make</code> <b>now</b></li><li><a href="https://x.dev">x</a></li></ol>"#),
            "1. Run `make` **now**\n2. [x](https://x.dev)\n\n"
        );
    }

    #[test]
    fn test_paragraph_wrapped_items() {
        assert_eq!(
            markdown("<ul><li><p>First</p><ul><li>inner</li></ul></li><li><p>Second</p></li></ul>"),
            "- First\n  - inner\n- Second\n\n"
        );
    }

    #[test]
    fn test_code_block_in_item() {
        assert_eq!(
            markdown("<ol><li>Install:<pre><code class=\"language-bash\">cargo install hunter</code></pre></li></ol>"),
            "1. Install:\n   ```bash\n   cargo install hunter\n   ```\n\n"
        );
    }

    #[test]
    fn test_invalid_start_is_ignored() {
        let record = parse(r#"<ol start="x"><li>a</li></ol>"#);
        assert_eq!(record.meta_str(keys::START), None);
    }
}
