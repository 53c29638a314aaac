//! Content-root location.
//!
//! Strategies are tried in a fixed order and the first non-empty candidate
//! wins:
//!
//! 1. `<main>` or `[role=main]`
//! 2. an element whose `id` contains a content hint
//! 3. an element whose `class` contains a known content class
//! 4. `<article>`
//! 5. `<body>`
//!
//! A candidate is non-empty when it has at least one element child that is
//! neither decorative nor on the skip list. Candidates that are skip-list
//! elements, or sit inside one, are passed over, as are id/class matches
//! marked as page chrome (`sidebar-content`, `nav-main`, ...).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::element::ElementExt;
use crate::utilities::{has_skip_word, is_decorative, is_skip_tag};
use crate::{HunterError, Result};

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("main, [role='main']").expect("hardcoded selector 'main' is valid")
});

static ID_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[id]").expect("hardcoded selector '[id]' is valid"));

static CLASS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[class]").expect("hardcoded selector '[class]' is valid"));

static ARTICLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article").expect("hardcoded selector 'article' is valid"));

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("hardcoded selector 'body' is valid"));

/// Substrings of an `id` that indicate the main content, in priority order
pub const CONTENT_ID_HINTS: &[&str] = &[
    "main-content",
    "maincontent",
    "content",
    "article",
    "documentation",
    "docs",
];

/// Class names of well-known content containers, in priority order
pub const CONTENT_CLASS_HINTS: &[&str] = &[
    "docs-content",
    "article-content",
    "main-content",
    "markdown-body",
    "post-content",
    "entry-content",
    "page-content",
    "theme-doc-markdown",
    "rst-content",
];

/// Strategy that selected the content root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    MainTag,
    ContentId,
    ContentClass,
    Article,
    Body,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::MainTag => "main tag",
            Strategy::ContentId => "content id",
            Strategy::ContentClass => "content class",
            Strategy::Article => "article tag",
            Strategy::Body => "body",
        };
        f.write_str(name)
    }
}

/// The located main content region
#[derive(Debug, Clone, Copy)]
pub struct ContentRoot<'a> {
    pub element: ElementRef<'a>,
    pub strategy: Strategy,
}

/// Whether a candidate holds at least one element child that is neither
/// decorative nor dropped by the skip list
fn is_content_bearing(element: &ElementRef) -> bool {
    element.element_children().any(|child| {
        let tag = child.tag_name();
        !is_decorative(tag) && !is_skip_tag(tag)
    })
}

/// Whether the element is, or sits inside, a skip-list element
fn in_skipped_subtree(element: &ElementRef) -> bool {
    is_skip_tag(element.tag_name())
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_skip_tag(ancestor.tag_name()))
}

fn is_tag_candidate(element: &ElementRef) -> bool {
    !in_skipped_subtree(element) && is_content_bearing(element)
}

fn is_candidate(element: &ElementRef) -> bool {
    !has_skip_word(&element.marker_words()) && is_tag_candidate(element)
}

fn attr_contains(element: &ElementRef, attr: &str, hint: &str) -> bool {
    element
        .value()
        .attr(attr)
        .map(|value| value.to_lowercase().contains(hint))
        .unwrap_or(false)
}

fn by_hints<'a>(
    document: &'a Html,
    selector: &Selector,
    attr: &str,
    hints: &[&str],
) -> Option<ElementRef<'a>> {
    hints.iter().find_map(|hint| {
        document
            .select(selector)
            .find(|el| attr_contains(el, attr, hint) && is_candidate(el))
    })
}

/// Find the main content region of a document.
///
/// Fails with [`HunterError::NoContentRoot`] only when the document has no
/// body, or a body with neither content elements nor text.
pub fn locate_content_root(document: &Html) -> Result<ContentRoot<'_>> {
    let found = document
        .select(&MAIN_SELECTOR)
        .find(is_tag_candidate)
        .map(|el| (el, Strategy::MainTag))
        .or_else(|| {
            by_hints(document, &ID_SELECTOR, "id", CONTENT_ID_HINTS)
                .map(|el| (el, Strategy::ContentId))
        })
        .or_else(|| {
            by_hints(document, &CLASS_SELECTOR, "class", CONTENT_CLASS_HINTS)
                .map(|el| (el, Strategy::ContentClass))
        })
        .or_else(|| {
            document
                .select(&ARTICLE_SELECTOR)
                .find(is_tag_candidate)
                .map(|el| (el, Strategy::Article))
        });

    if let Some((element, strategy)) = found {
        tracing::debug!(%strategy, tag = element.tag_name(), "located content root");
        return Ok(ContentRoot { element, strategy });
    }

    let body = document
        .select(&BODY_SELECTOR)
        .next()
        .ok_or(HunterError::NoContentRoot)?;

    if is_content_bearing(&body) || body.has_text() {
        tracing::debug!(strategy = %Strategy::Body, "located content root");
        Ok(ContentRoot {
            element: body,
            strategy: Strategy::Body,
        })
    } else {
        Err(HunterError::NoContentRoot)
    }
}
