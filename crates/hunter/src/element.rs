//! Convenience accessors over scraper elements.
//!
//! scraper exposes the raw html5ever tree; the parsers mostly need tag
//! names, trimmed attributes, class/id words and flattened text.

use scraper::{ElementRef, Node};

/// Extension methods for [`ElementRef`]
pub trait ElementExt<'a> {
    /// Lowercase tag name
    fn tag_name(&self) -> &'a str;

    /// Attribute value, trimmed, `None` when absent or blank
    fn clean_attr(&self, name: &str) -> Option<&'a str>;

    /// Words of the `class` and `id` attributes, split on whitespace, `-` and `_`
    fn marker_words(&self) -> Vec<String>;

    /// Element children, skipping text and comment nodes
    fn element_children(&self) -> Box<dyn Iterator<Item = ElementRef<'a>> + 'a>;

    /// Concatenated text of all descendants
    fn text_content(&self) -> String;

    /// Whether any descendant text is non-whitespace
    fn has_text(&self) -> bool;

    /// Text for preformatted content, with `<br>` read as a line break
    fn preformatted_text(&self) -> String;
}

impl<'a> ElementExt<'a> for ElementRef<'a> {
    fn tag_name(&self) -> &'a str {
        self.value().name()
    }

    fn clean_attr(&self, name: &str) -> Option<&'a str> {
        self.value()
            .attr(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn marker_words(&self) -> Vec<String> {
        let class = self.value().attr("class").unwrap_or("");
        let id = self.value().attr("id").unwrap_or("");

        class
            .split_whitespace()
            .chain(id.split_whitespace())
            .flat_map(|token| token.split(|c| c == '-' || c == '_'))
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    fn element_children(&self) -> Box<dyn Iterator<Item = ElementRef<'a>> + 'a> {
        Box::new(self.children().filter_map(ElementRef::wrap))
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn has_text(&self) -> bool {
        self.text().any(|t| !t.trim().is_empty())
    }

    fn preformatted_text(&self) -> String {
        let mut out = String::new();
        collect_preformatted(*self, &mut out);
        out
    }
}

fn collect_preformatted(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_preformatted(child_element, out);
                }
            }
            _ => {}
        }
    }
}
