//! HTML parsing and DOM queries.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! thread pages and selecting post elements with CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use aaview_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <dl>
//!                 <dt>1 ：名無しさん</dt>
//!                 <dd>hello<br>world</dd>
//!             </dl>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let bodies = doc.select("dd").unwrap();
//! assert_eq!(bodies[0].text_with_line_breaks(), "hello\nworld");
//! ```

use scraper::{Html, Node, Selector};

use crate::{AaviewError, Result};

/// Elements whose text never belongs to a post.
const SKIPPED_TEXT_PARENTS: [&str; 2] = ["script", "style"];

/// Represents a parsed HTML document.
///
/// Parsing is infallible: malformed markup is repaired the way browsers
/// repair it, which matters for archive pages that rarely close their
/// `<dt>`/`<dd>` tags.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Selects elements using a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`AaviewError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aaview_core::parse::Document;
    ///
    /// let doc = Document::parse("<dl><dt>a</dt><dd>b</dd><dt>c</dt><dd>d</dd></dl>");
    /// assert_eq!(doc.select("dt").unwrap().len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the title of the document.
    ///
    /// Returns the trimmed content of the `<title>` element if present and non-empty.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AaviewError::HtmlParseError(format!("Invalid selector {:?}: {}", selector, e)))
}

/// A wrapper around scraper's ElementRef.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl Element<'_> {
    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes, entities decoded, with
    /// nothing inserted between them.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the text content with every `<br>` turned into one `\n`.
    ///
    /// Text nodes are copied verbatim and every other tag contributes
    /// nothing, so no newline appears that the source did not mark with a
    /// line break. Text inside `<script>` and `<style>` is dropped.
    pub fn text_with_line_breaks(&self) -> String {
        let mut out = String::new();

        for node in self.element.descendants().skip(1) {
            match node.value() {
                Node::Text(text) => {
                    let hidden = node
                        .parent()
                        .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                        .is_some_and(|name| SKIPPED_TEXT_PARENTS.contains(&name));
                    if !hidden {
                        out.push_str(text);
                    }
                }
                Node::Element(el) if el.name() == "br" => out.push('\n'),
                _ => {}
            }
        }

        out
    }
}
