//! hunter-core - parse records and Markdown formatting
//!
//! This crate holds the pieces of the hunter pipeline that never touch HTML:
//! the [`ParseRecord`] intermediate form, code language detection, the
//! per-type formatters and final document assembly. The `hunter` crate
//! builds records from a DOM and hands them here.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────┐   format_record   ┌───────────┐
//! ParseRecord ──▶ │  formatters  │ ────────────────▶ │ fragments │ ──assemble──▶ Markdown
//!                 └──────────────┘                   └───────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use hunter_core::{assemble, format_record, ContentType, FormatOptions, ParseRecord};
//!
//! let options = FormatOptions::default();
//! let records = vec![
//!     ParseRecord::new(ContentType::Heading, "Title").with_level(2),
//!     ParseRecord::new(ContentType::Paragraph, "Hello **world**"),
//! ];
//!
//! let markdown = assemble(records.iter().map(|r| format_record(r, &options)));
//! assert_eq!(markdown, "## Title\n\nHello **world**\n");
//! ```

mod assemble;
mod code;
mod format;
mod language;
mod link;
mod options;
mod record;

pub use assemble::{assemble, normalize_blank_lines};
pub use code::{format_code_block, resolve_language, trim_blank_lines};
pub use format::{clean_text, collapse_whitespace, format_record, formatter_for, FormatFn};
pub use language::{detect_language, language_from_class, normalize_language};
pub use link::{escape_link_text, is_well_formed_href, render_image, render_link};
pub use options::FormatOptions;
pub use record::{keys, ContentType, MetaValue, Metadata, ParseRecord};
