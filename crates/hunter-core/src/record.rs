//! Parse records
//!
//! A [`ParseRecord`] is the normalized intermediate form of one structural
//! element. Parsers build records, formatters read them, nothing mutates
//! them in between.

use indexmap::IndexMap;

/// Well-known metadata keys.
pub mod keys {
    /// Programming language of a code block
    pub const LANGUAGE_HINT: &str = "language_hint";
    /// Link target, or image source for images
    pub const HREF: &str = "href";
    /// Image alternative text
    pub const ALT: &str = "alt";
    /// Link or image title attribute
    pub const TITLE: &str = "title";
    /// Whether a list is numbered
    pub const ORDERED: &str = "ordered";
    /// First number of an ordered list
    pub const START: &str = "start";
}

/// Structural content types a record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Heading,
    CodeBlock,
    List,
    Link,
    Image,
    Paragraph,
}

impl ContentType {
    /// All content types, in classification priority order
    pub const ALL: [ContentType; 6] = [
        ContentType::Heading,
        ContentType::CodeBlock,
        ContentType::List,
        ContentType::Image,
        ContentType::Link,
        ContentType::Paragraph,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Heading => "heading",
            ContentType::CodeBlock => "code_block",
            ContentType::List => "list",
            ContentType::Link => "link",
            ContentType::Image => "image",
            ContentType::Paragraph => "paragraph",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metadata value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Flag(value)
    }
}

/// Auxiliary fields of a record, in insertion order
pub type Metadata = IndexMap<String, MetaValue>;

/// Normalized representation of one structural element
#[derive(Debug, Clone, PartialEq)]
pub struct ParseRecord {
    content_type: ContentType,
    raw_text: String,
    level: usize,
    metadata: Metadata,
    children: Vec<ParseRecord>,
}

impl ParseRecord {
    pub fn new(content_type: ContentType, raw_text: impl Into<String>) -> Self {
        Self {
            content_type,
            raw_text: raw_text.into(),
            level: 0,
            metadata: Metadata::new(),
            children: Vec::new(),
        }
    }

    /// An empty record, returned by parsers for malformed elements
    pub fn empty(content_type: ContentType) -> Self {
        Self::new(content_type, String::new())
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<ParseRecord>) -> Self {
        self.children = children;
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn children(&self) -> &[ParseRecord] {
        &self.children
    }

    /// Text metadata value, if present and non-empty
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetaValue::Text(text)) if !text.is_empty() => Some(text.as_str()),
            _ => None,
        }
    }

    /// Flag metadata value; absent flags read as false
    pub fn meta_flag(&self, key: &str) -> bool {
        matches!(self.metadata.get(key), Some(MetaValue::Flag(true)))
    }

    /// A record with no text and no children carries nothing to render
    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty() && self.children.iter().all(|c| c.is_blank())
    }
}
