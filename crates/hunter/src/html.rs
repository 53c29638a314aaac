//! HTML parsing support.
//!
//! Documents are parsed with scraper (html5ever), which repairs malformed
//! markup the way a browser would and decodes character entities, so text
//! read from the tree never carries unresolved entities.

use scraper::Html;
use url::Url;

use crate::{HunterError, Result};

/// Parse an HTML string into a document tree.
///
/// Fragments are accepted too: html5ever wraps them in `html` and `body`.
///
/// # Example
///
/// ```rust
/// use hunter::parse_document;
///
/// let document = parse_document("<h1>Hello <em>World</em></h1>");
/// assert_eq!(document.root_element().value().name(), "html");
/// ```
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Parse the originating locator of a document, if one was given
pub fn parse_base_url(base_url: Option<&str>) -> Result<Option<Url>> {
    base_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| {
            Url::parse(url).map_err(|e| HunterError::InvalidInput(format!("base URL {url}: {e}")))
        })
        .transpose()
}
