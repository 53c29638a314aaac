//! Link and image formatting
//!
//! A reference is rendered as Markdown only when it is a well-formed
//! absolute or relative reference. Anything else degrades to plain text so
//! a broken `href` never produces a broken link.

use once_cell::sync::Lazy;
use url::Url;

use crate::format::collapse_whitespace;
use crate::options::FormatOptions;
use crate::record::{keys, ParseRecord};

/// Schemes that can appear in an absolute reference
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "ftp", "tel"];

static RELATIVE_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("https://relative.invalid/").expect("static base URL is valid"));

/// Check whether `href` is a syntactically well-formed reference
pub fn is_well_formed_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href == "#" || href.chars().any(char::is_control) {
        return false;
    }

    match Url::parse(href) {
        Ok(url) => ALLOWED_SCHEMES.contains(&url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => RELATIVE_BASE.join(href).is_ok(),
        Err(_) => false,
    }
}

/// Escape characters that would end the text part of a link early
pub fn escape_link_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Percent-encode characters that would end the destination part early
fn encode_href(href: &str) -> String {
    let mut result = String::with_capacity(href.len());

    for c in href.trim().chars() {
        match c {
            ' ' => result.push_str("%20"),
            '(' => result.push_str("%28"),
            ')' => result.push_str("%29"),
            '<' => result.push_str("%3C"),
            '>' => result.push_str("%3E"),
            _ => result.push(c),
        }
    }

    result
}

fn title_part(title: Option<&str>) -> String {
    title
        .map(collapse_whitespace)
        .filter(|t| !t.is_empty())
        .map(|t| format!(" \"{}\"", t.replace('"', "\\\"")))
        .unwrap_or_default()
}

/// Render an inline link, or plain text when the reference is malformed
pub fn render_link(text: &str, href: &str, title: Option<&str>) -> String {
    let text = collapse_whitespace(text);

    if !is_well_formed_href(href) {
        return text;
    }

    let text = if text.is_empty() {
        href.trim().to_string()
    } else {
        text
    };

    format!(
        "[{}]({}{})",
        escape_link_text(&text),
        encode_href(href),
        title_part(title)
    )
}

/// Render an inline image, or its alt text when the source is malformed
pub fn render_image(alt: &str, src: &str, title: Option<&str>) -> String {
    let alt = collapse_whitespace(alt);

    if !is_well_formed_href(src) {
        return alt;
    }

    format!(
        "![{}]({}{})",
        escape_link_text(&alt),
        encode_href(src),
        title_part(title)
    )
}

pub(crate) fn format_link(record: &ParseRecord, _: &FormatOptions) -> String {
    let href = record.meta_str(keys::HREF).unwrap_or("");
    let rendered = render_link(record.raw_text(), href, record.meta_str(keys::TITLE));
    block(rendered)
}

pub(crate) fn format_image(record: &ParseRecord, _: &FormatOptions) -> String {
    let src = record.meta_str(keys::HREF).unwrap_or("");
    let alt = record.meta_str(keys::ALT).unwrap_or("");
    let rendered = render_image(alt, src, record.meta_str(keys::TITLE));
    block(rendered)
}

fn block(rendered: String) -> String {
    if rendered.is_empty() {
        rendered
    } else {
        format!("{}\n\n", rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ContentType;

    #[test]
    fn test_well_formed_hrefs() {
        assert!(is_well_formed_href("https://example.com/a?b=c#d"));
        assert!(is_well_formed_href("/docs/intro"));
        assert!(is_well_formed_href("../guide.html"));
        assert!(is_well_formed_href("#section-2"));
        assert!(is_well_formed_href("mailto:someone@example.com"));
        assert!(is_well_formed_href("my page.html"));
    }

    #[test]
    fn test_malformed_hrefs() {
        assert!(!is_well_formed_href(""));
        assert!(!is_well_formed_href("   "));
        assert!(!is_well_formed_href("#"));
        assert!(!is_well_formed_href("javascript:void(0)"));
        assert!(!is_well_formed_href("http://[::1"));
        assert!(!is_well_formed_href("a\u{0}b"));
    }

    #[test]
    fn test_render_link() {
        assert_eq!(
            render_link("Example", "https://example.com", None),
            "[Example](https://example.com)"
        );
        assert_eq!(
            render_link("Docs", "/a b(c)", Some("The \"docs\"")),
            "[Docs](/a%20b%28c%29 \"The \\\"docs\\\"\")"
        );
    }

    #[test]
    fn test_link_text_is_escaped() {
        assert_eq!(
            render_link("[1] notes", "/notes", None),
            "[\\[1\\] notes](/notes)"
        );
    }

    #[test]
    fn test_malformed_link_degrades_to_text() {
        assert_eq!(render_link("Click here", "", None), "Click here");
        assert_eq!(render_link("Run", "javascript:run()", None), "Run");
    }

    #[test]
    fn test_empty_text_uses_href() {
        assert_eq!(
            render_link("", "https://example.com", None),
            "[https://example.com](https://example.com)"
        );
    }

    #[test]
    fn test_render_image() {
        assert_eq!(render_image("Logo", "/logo.png", None), "![Logo](/logo.png)");
        assert_eq!(render_image("Logo", "", None), "Logo");
    }

    #[test]
    fn test_format_image_record() {
        let record = ParseRecord::new(ContentType::Image, "Diagram")
            .with_meta(keys::HREF, "img/diagram.svg")
            .with_meta(keys::ALT, "Diagram");
        assert_eq!(
            format_image(&record, &FormatOptions::default()),
            "![Diagram](img/diagram.svg)\n\n"
        );
    }

    #[test]
    fn test_format_link_record_without_href() {
        let record = ParseRecord::new(ContentType::Link, "Just text");
        assert_eq!(format_link(&record, &FormatOptions::default()), "Just text\n\n");
    }
}
