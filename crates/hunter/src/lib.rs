//! # hunter
//!
//! Extract the main content of an HTML document as clean Markdown.
//!
//! ## Design
//!
//! The pipeline runs strictly left to right:
//!
//! - **Locate**: pick the main content region (`main`, content ids, known
//!   content classes, `article`, then `body`)
//! - **Dispatch**: classify each child element and hand it to the parser
//!   registered for its content type, producing [`ParseRecord`]s
//! - **Format**: render each record through `hunter_core` and assemble the
//!   fragments with normalized spacing
//! - **Enhance** (optional): pass the Markdown through an [`Enhancer`] with
//!   a timeout, keeping the assembled Markdown when anything goes wrong
//!
//! ## Example
//!
//! ```rust
//! use hunter::Hunter;
//!
//! let hunter = Hunter::new();
//! let markdown = hunter
//!     .convert("<h2>Title</h2><p>Hello <b>world</b></p>", None)
//!     .unwrap();
//! assert_eq!(markdown, "## Title\n\nHello **world**\n");
//! ```

mod classify;
mod dispatch;
pub mod element;
mod enhance;
mod fetch;
pub mod html;
mod locate;
mod parsers;
mod service;
mod together;
mod utilities;

pub use classify::{classify, Classification};
pub use dispatch::Dispatcher;
pub use enhance::{
    clean_enhanced_output, enhance_with_fallback, judge, Conversion, EnhanceError, EnhancementOutcome, Enhancer,
    DEFAULT_MIN_LENGTH_RATIO,
};
pub use fetch::{fetch_html, FETCH_TIMEOUT, USER_AGENT};
pub use html::parse_document;
pub use locate::{locate_content_root, ContentRoot, Strategy};
pub use parsers::{Filter, ParseContext, ParseFn, Parsers, PredicateFn};
pub use service::{Hunter, HunterOptions, DEFAULT_ENHANCE_TIMEOUT};
pub use together::{TogetherConfig, TogetherEnhancer, DEFAULT_MODEL, TOGETHER_API_URL};
pub use utilities::*;

pub use hunter_core::{ContentType, FormatOptions, ParseRecord};

/// Error type for hunter operations
#[derive(Debug, thiserror::Error)]
pub enum HunterError {
    #[error("could not locate content in this document")]
    NoContentRoot,

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, HunterError>;
