//! Skip filters for dispatch.

use scraper::ElementRef;

use crate::element::ElementExt;

/// Predicate signature for [`Filter::Predicate`]
pub type PredicateFn = Box<dyn Fn(&str, &ElementRef) -> bool + Send + Sync>;

/// A filter determines which elements are dropped before classification
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match a word of the `class` or `id` attribute
    MarkerWord(String),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter for a `class`/`id` word such as `promo` in `promo-box`
    pub fn marker_word(word: &str) -> Self {
        Filter::MarkerWord(word.to_lowercase())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &ElementRef) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches an element
    pub fn matches(&self, element: &ElementRef) -> bool {
        let tag = element.tag_name();
        match self {
            Filter::TagName(t) => tag == t,
            Filter::TagNames(tags) => tags.iter().any(|t| t == tag),
            Filter::MarkerWord(word) => element.marker_words().iter().any(|w| w == word),
            Filter::Predicate(f) => f(tag, element),
        }
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::TagName(t) => f.debug_tuple("TagName").field(t).finish(),
            Filter::TagNames(tags) => f.debug_tuple("TagNames").field(tags).finish(),
            Filter::MarkerWord(w) => f.debug_tuple("MarkerWord").field(w).finish(),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
