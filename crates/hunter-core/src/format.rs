//! Parse record formatting
//!
//! Each content type maps to a pure rendering function. Every block fragment
//! ends with a blank line; [`crate::assemble`] normalizes the spacing when
//! fragments are joined.

use crate::code::format_code_block;
use crate::link::{format_image, format_link};
use crate::options::FormatOptions;
use crate::record::{keys, ContentType, ParseRecord};

/// Signature shared by all formatters
pub type FormatFn = fn(&ParseRecord, &FormatOptions) -> String;

/// Formatter for a content type
pub fn formatter_for(content_type: ContentType) -> FormatFn {
    match content_type {
        ContentType::Heading => format_heading,
        ContentType::CodeBlock => format_code_block,
        ContentType::List => format_list,
        ContentType::Link => format_link,
        ContentType::Image => format_image,
        ContentType::Paragraph => format_paragraph,
    }
}

/// Format a single record into a Markdown fragment
pub fn format_record(record: &ParseRecord, options: &FormatOptions) -> String {
    formatter_for(record.content_type())(record, options)
}

/// Collapse runs of whitespace inside each line, trim lines and drop empty ones.
///
/// Line breaks survive so `<br>` inside paragraphs keeps its meaning.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse all whitespace (line breaks included) into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn format_heading(record: &ParseRecord, _: &FormatOptions) -> String {
    let text = collapse_whitespace(record.raw_text());
    if text.is_empty() {
        return String::new();
    }

    let level = record.level().clamp(1, 6);
    format!("{} {}\n\n", "#".repeat(level), text)
}

fn format_paragraph(record: &ParseRecord, _: &FormatOptions) -> String {
    let text = clean_text(record.raw_text());
    if text.is_empty() {
        return String::new();
    }
    format!("{}\n\n", text)
}

fn format_list(record: &ParseRecord, options: &FormatOptions) -> String {
    let mut out = String::new();
    write_list(record, options, 0, &mut out);

    if out.is_empty() {
        return out;
    }
    out.push('\n');
    out
}

/// Column where content nested under an item starts: past the item's
/// marker, and at least `list_indent` in
fn nested_column(indent: usize, marker: &str, options: &FormatOptions) -> usize {
    indent + options.list_indent.max(marker.chars().count() + 1)
}

fn write_list(record: &ParseRecord, options: &FormatOptions, indent: usize, out: &mut String) {
    let ordered = record.meta_flag(keys::ORDERED);
    let mut number: u64 = record
        .meta_str(keys::START)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    let marker_for = |number: u64| {
        if ordered {
            format!("{}.", number)
        } else {
            options.bullet_list_marker.to_string()
        }
    };

    // blocks nested before the first item line up with its marker
    let mut child_column = nested_column(indent, &marker_for(number), options);

    for child in record.children() {
        match child.content_type() {
            ContentType::List => write_list(child, options, child_column, out),
            ContentType::CodeBlock => {
                let block = format_code_block(child, options);
                let pad = " ".repeat(child_column);
                for line in block.trim_end().lines() {
                    if !line.is_empty() {
                        out.push_str(&pad);
                    }
                    out.push_str(line);
                    out.push('\n');
                }
            }
            _ => {
                let text = clean_text(child.raw_text());
                if text.is_empty() {
                    continue;
                }

                let marker = marker_for(number);
                if ordered {
                    number += 1;
                }
                child_column = nested_column(indent, &marker, options);

                // continuation lines line up with the item text
                let continuation = " ".repeat(indent + marker.chars().count() + 1);
                for (i, line) in text.lines().enumerate() {
                    if i == 0 {
                        out.push_str(&" ".repeat(indent));
                        out.push_str(&marker);
                        out.push(' ');
                    } else {
                        out.push_str(&continuation);
                    }
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }
}
