//! Utility functions and constants for HTML processing.

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dir",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hgroup", "hr", "li", "main", "menu", "nav", "ol", "p", "pre",
    "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Generic containers that are descended into when they hold block children
pub const CONTAINER_ELEMENTS: &[&str] = &[
    "div", "section", "article", "main", "header", "figure", "details", "blockquote",
    "center", "dl", "dd", "table", "tbody", "thead", "tfoot", "tr", "td", "th", "span",
];

/// Elements that never carry readable content
pub const DECORATIVE_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "canvas", "iframe", "link", "meta",
    "head", "title", "base", "object", "embed", "button", "input", "select", "textarea",
    "hr", "br", "wbr",
];

/// Elements dropped together with their subtree
pub const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "canvas", "iframe", "nav", "footer",
    "aside", "form", "button", "input", "select", "textarea", "object", "embed", "dialog",
];

/// `class`/`id` words that mark navigation, ads and other page chrome
pub const SKIP_WORDS: &[&str] = &[
    "sidebar", "nav", "navbar", "navigation", "menu", "footer", "search", "ad", "ads",
    "advert", "advertisement", "sponsored", "cookie", "cookies", "banner", "breadcrumb",
    "breadcrumbs", "toc", "share", "social", "comments", "popup", "modal", "skip",
];

/// Class markers used by syntax highlighters on code containers
pub const CODE_MARKERS: &[&str] = &["hljs", "highlight", "highlighter-rouge", "code-block", "codehilite"];

/// Heading tags, in level order
pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is a generic container
pub fn is_container(tag: &str) -> bool {
    CONTAINER_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is purely decorative
pub fn is_decorative(tag: &str) -> bool {
    DECORATIVE_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is on the skip list
pub fn is_skip_tag(tag: &str) -> bool {
    SKIP_TAGS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is a heading, returning its level
pub fn heading_level(tag: &str) -> Option<usize> {
    let tag = tag.to_lowercase();
    HEADING_TAGS.iter().position(|h| *h == tag).map(|i| i + 1)
}

/// Check if any `class`/`id` word marks page chrome
pub fn has_skip_word<S: AsRef<str>>(words: &[S]) -> bool {
    words.iter().any(|w| SKIP_WORDS.contains(&w.as_ref()))
}

/// Check if a `class` attribute carries a syntax-highlighter marker
pub fn has_code_marker(class: &str) -> bool {
    class.split_whitespace().any(|c| {
        let c = c.to_lowercase();
        CODE_MARKERS.contains(&c.as_str()) || c.starts_with("language-") || c.starts_with("highlight-")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_block() {
        assert!(is_block("div"));
        assert!(is_block("p"));
        assert!(is_block("DIV"));
        assert!(!is_block("span"));
        assert!(!is_block("a"));
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("H6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("header"), None);
    }

    #[test]
    fn test_skip_words() {
        assert!(has_skip_word(&["left", "sidebar"]));
        assert!(has_skip_word(&["ad"]));
        assert!(!has_skip_word(&["main", "content"]));
        // substrings are not words
        assert!(!has_skip_word(&["loaded", "navigator"]));
    }

    #[test]
    fn test_code_markers() {
        assert!(has_code_marker("hljs"));
        assert!(has_code_marker("language-rust"));
        assert!(has_code_marker("highlight-python notranslate"));
        assert!(!has_code_marker("content"));
    }
}
