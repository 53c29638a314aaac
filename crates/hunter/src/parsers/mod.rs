//! Element parsers.
//!
//! One parser per content type turns a classified element into a
//! [`ParseRecord`]. Parsers are kept in an insertion-ordered registry so
//! callers can replace the parser for any content type.

mod code;
mod filter;
mod heading;
mod inline;
mod link;
mod list;
mod paragraph;

pub use filter::{Filter, PredicateFn};

pub(crate) use inline::{push_text, render_element};

use indexmap::IndexMap;
use scraper::ElementRef;
use url::Url;

use hunter_core::{ContentType, FormatOptions, ParseRecord};

use crate::dispatch::Dispatcher;

/// Type alias for parser functions
pub type ParseFn = Box<dyn Fn(&ElementRef, &ParseContext) -> ParseRecord + Send + Sync>;

/// Registry of parsers keyed by content type
pub struct Parsers {
    parsers: IndexMap<ContentType, ParseFn>,
}

impl Parsers {
    /// Create a registry with the built-in parsers
    pub fn new() -> Self {
        let mut parsers = Self {
            parsers: IndexMap::new(),
        };
        parsers.set(ContentType::Heading, heading::parse_heading);
        parsers.set(ContentType::CodeBlock, code::parse_code_block);
        parsers.set(ContentType::List, list::parse_list);
        parsers.set(ContentType::Link, link::parse_link);
        parsers.set(ContentType::Image, link::parse_image);
        parsers.set(ContentType::Paragraph, paragraph::parse_paragraph);
        parsers
    }

    /// Register or replace the parser for a content type
    pub fn set<F>(&mut self, content_type: ContentType, parser: F)
    where
        F: Fn(&ElementRef, &ParseContext) -> ParseRecord + Send + Sync + 'static,
    {
        self.parsers.insert(content_type, Box::new(parser));
    }

    /// Get the parser for a content type
    pub fn get(&self, content_type: ContentType) -> Option<&ParseFn> {
        self.parsers.get(&content_type)
    }

    /// Content types with a registered parser, in registration order
    pub fn content_types(&self) -> impl Iterator<Item = ContentType> + '_ {
        self.parsers.keys().copied()
    }

    /// Run the parser for a content type.
    ///
    /// A missing parser yields an empty record, which is filtered out later.
    pub fn parse(
        &self,
        content_type: ContentType,
        element: &ElementRef,
        ctx: &ParseContext,
    ) -> ParseRecord {
        match self.get(content_type) {
            Some(parser) => parser(element, ctx),
            None => ParseRecord::empty(content_type),
        }
    }
}

impl Default for Parsers {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a parser may consult while building a record
pub struct ParseContext<'a> {
    base_url: Option<&'a Url>,
    options: &'a FormatOptions,
    dispatcher: &'a Dispatcher,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(
        base_url: Option<&'a Url>,
        options: &'a FormatOptions,
        dispatcher: &'a Dispatcher,
    ) -> Self {
        Self {
            base_url,
            options,
            dispatcher,
        }
    }

    /// Originating locator of the document, if known
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url
    }

    /// Formatting options; inline syntax uses the same delimiters
    pub fn options(&self) -> &FormatOptions {
        self.options
    }

    /// Parse a nested element with the registered parser for `content_type`
    pub fn parse(&self, content_type: ContentType, element: &ElementRef) -> ParseRecord {
        self.dispatcher.parsers().parse(content_type, element, self)
    }

    /// Whether the element is dropped by the skip list or a custom filter
    pub fn is_skipped(&self, element: &ElementRef) -> bool {
        self.dispatcher.is_skipped(element)
    }

    /// Render an element's content as inline Markdown
    pub fn render_inline(&self, element: &ElementRef) -> String {
        inline::render_inline(element, self)
    }

    /// Resolve a reference against the base URL.
    ///
    /// Fragment-only references and references that fail to resolve are
    /// returned unchanged.
    pub fn resolve_url(&self, href: &str) -> String {
        let href = href.trim();
        if href.starts_with('#') {
            return href.to_string();
        }

        match self.base_url {
            Some(base) => base
                .join(href)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}
