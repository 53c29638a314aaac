//! Hunter - the main entry point for HTML to Markdown extraction.

use std::sync::Arc;
use std::time::Duration;

use scraper::ElementRef;

use hunter_core::{assemble, format_record, ContentType, FormatOptions, ParseRecord};

use crate::dispatch::Dispatcher;
use crate::enhance::{
    enhance_with_fallback, Conversion, EnhanceError, EnhancementOutcome, Enhancer,
    DEFAULT_MIN_LENGTH_RATIO,
};
use crate::html::{parse_base_url, parse_document};
use crate::locate::locate_content_root;
use crate::parsers::{Filter, ParseContext};
use crate::Result;

/// Default bound on the enhancement call
pub const DEFAULT_ENHANCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for [`Hunter`]
#[derive(Debug, Clone)]
pub struct HunterOptions {
    /// Markdown formatting options
    pub format: FormatOptions,

    /// Bound on the enhancement call
    pub enhance_timeout: Duration,

    /// Minimum share of characters an enhanced document must keep
    pub min_length_ratio: f64,
}

impl Default for HunterOptions {
    fn default() -> Self {
        Self {
            format: FormatOptions::default(),
            enhance_timeout: DEFAULT_ENHANCE_TIMEOUT,
            min_length_ratio: DEFAULT_MIN_LENGTH_RATIO,
        }
    }
}

/// Converts HTML documents to Markdown
pub struct Hunter {
    options: HunterOptions,
    dispatcher: Dispatcher,
    enhancer: Option<Arc<dyn Enhancer>>,
}

impl Hunter {
    /// Create a Hunter with default options and no enhancer
    pub fn new() -> Self {
        Self::with_options(HunterOptions::default())
    }

    /// Create a Hunter with custom options
    pub fn with_options(options: HunterOptions) -> Self {
        Self {
            options,
            dispatcher: Dispatcher::new(),
            enhancer: None,
        }
    }

    /// Attach an enhancer used by [`Hunter::convert_and_enhance`]
    pub fn with_enhancer(mut self, enhancer: Arc<dyn Enhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    pub fn options(&self) -> &HunterOptions {
        &self.options
    }

    /// Replace the parser for a content type
    pub fn set_parser<F>(&mut self, content_type: ContentType, parser: F) -> &mut Self
    where
        F: Fn(&ElementRef, &ParseContext) -> ParseRecord + Send + Sync + 'static,
    {
        self.dispatcher.set_parser(content_type, parser);
        self
    }

    /// Drop elements matching the filter
    pub fn skip(&mut self, filter: Filter) -> &mut Self {
        self.dispatcher.skip(filter);
        self
    }

    /// Parse the main content of a document into records.
    ///
    /// `base_url` is the document's originating locator; relative links and
    /// image sources are resolved against it.
    pub fn extract(&self, html: &str, base_url: Option<&str>) -> Result<Vec<ParseRecord>> {
        let base_url = parse_base_url(base_url)?;
        let document = parse_document(html);
        let root = locate_content_root(&document)?;

        Ok(self
            .dispatcher
            .dispatch(&root.element, base_url.as_ref(), &self.options.format))
    }

    /// Format and assemble records into one Markdown document
    pub fn render(&self, records: &[ParseRecord]) -> String {
        assemble(
            records
                .iter()
                .map(|record| format_record(record, &self.options.format)),
        )
    }

    /// Convert HTML to Markdown without enhancement
    pub fn convert(&self, html: &str, base_url: Option<&str>) -> Result<String> {
        let records = self.extract(html, base_url)?;
        Ok(self.render(&records))
    }

    /// Convert HTML to Markdown, then run the enhancer if one is attached.
    ///
    /// Only a missing content root is an error; enhancement problems fall
    /// back to the assembled Markdown.
    pub async fn convert_and_enhance(
        &self,
        html: &str,
        base_url: Option<&str>,
    ) -> Result<Conversion> {
        let markdown = self.convert(html, base_url)?;
        Ok(self.enhance(&markdown).await)
    }

    /// Run the enhancer over assembled Markdown
    pub async fn enhance(&self, markdown: &str) -> Conversion {
        match &self.enhancer {
            Some(enhancer) => {
                enhance_with_fallback(
                    enhancer.as_ref(),
                    markdown,
                    self.options.enhance_timeout,
                    self.options.min_length_ratio,
                )
                .await
            }
            None => Conversion {
                markdown: markdown.to_string(),
                outcome: EnhancementOutcome::Fallback(EnhanceError::Disabled),
            },
        }
    }
}

impl Default for Hunter {
    fn default() -> Self {
        Self::new()
    }
}
