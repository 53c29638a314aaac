//! Inline Markdown rendering.
//!
//! Flattens an element's content into one string of inline Markdown: bold,
//! emphasis, code spans, strikethrough, links and images. Text whitespace
//! collapses to single spaces; `<br>` and block boundaries become line
//! breaks, which paragraph and list formatting keep.

use scraper::{ElementRef, Node};

use hunter_core::{collapse_whitespace, render_image, render_link};

use super::ParseContext;
use crate::classify::sole_image;
use crate::element::ElementExt;
use crate::utilities::{is_block, is_decorative};

/// Render an element's children as inline Markdown
pub(crate) fn render_inline(element: &ElementRef, ctx: &ParseContext) -> String {
    let mut out = String::new();
    render_children(element, ctx, &mut out);
    out
}

fn render_children(element: &ElementRef, ctx: &ParseContext, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(out, text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    render_element(&child_element, ctx, out);
                }
            }
            _ => {}
        }
    }
}

/// Append text with whitespace runs collapsed to one space
pub(crate) fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

fn push_line_break(out: &mut String) {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Wrap an element's inline content in a delimiter, keeping edge
/// whitespace outside it
fn push_wrapped(out: &mut String, element: &ElementRef, ctx: &ParseContext, delimiter: &str) {
    let raw = element.text_content();
    let inner = render_inline(element, ctx);
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        push_text(out, &raw);
        return;
    }

    if raw.starts_with(char::is_whitespace) {
        push_text(out, " ");
    }
    out.push_str(delimiter);
    out.push_str(trimmed);
    out.push_str(delimiter);
    if raw.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Code span with a backtick run longer than any run inside the code
fn code_span(code: &str) -> String {
    let longest = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let ticks = "`".repeat(longest + 1);

    if code.starts_with('`') || code.ends_with('`') {
        format!("{ticks} {code} {ticks}")
    } else {
        format!("{ticks}{code}{ticks}")
    }
}

fn inline_image(element: &ElementRef, ctx: &ParseContext) -> String {
    let src = element
        .clean_attr("src")
        .or_else(|| element.clean_attr("data-src"))
        .map(|src| ctx.resolve_url(src))
        .unwrap_or_default();
    let alt = element.clean_attr("alt").unwrap_or("");
    render_image(alt, &src, element.clean_attr("title"))
}

/// Render one element in inline context
pub(crate) fn render_element(element: &ElementRef, ctx: &ParseContext, out: &mut String) {
    let tag = element.tag_name();

    match tag {
        "br" | "hr" => {
            push_line_break(out);
            return;
        }
        _ if is_decorative(tag) || ctx.is_skipped(element) => return,
        _ => {}
    }

    let options = ctx.options();

    match tag {
        "strong" | "b" => push_wrapped(out, element, ctx, &options.strong_delimiter),
        "em" | "i" | "cite" => {
            push_wrapped(out, element, ctx, &options.em_delimiter.to_string())
        }
        "s" | "del" | "strike" => push_wrapped(out, element, ctx, "~~"),
        "code" | "kbd" | "samp" | "tt" => {
            let code = collapse_whitespace(&element.text_content());
            if !code.is_empty() {
                out.push_str(&code_span(&code));
            }
        }
        "img" => out.push_str(&inline_image(element, ctx)),
        "a" => {
            if let Some(image) = sole_image(element) {
                out.push_str(&inline_image(&image, ctx));
                return;
            }
            let href = element
                .clean_attr("href")
                .map(|href| ctx.resolve_url(href))
                .unwrap_or_default();
            let text = element.text_content();
            out.push_str(&render_link(&text, &href, element.clean_attr("title")));
        }
        _ if is_block(tag) => {
            push_line_break(out);
            render_children(element, ctx, out);
            push_line_break(out);
        }
        _ => render_children(element, ctx, out),
    }
}
