//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors.
//!
//! Besides whole-subtree text, both types expose *direct* text nodes: the
//! book pages mix labels, links and bare text inside one container, and most
//! fields are defined as "the first text node directly inside X".
//!
//! # Example
//!
//! ```rust
//! use folio_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1 id="bookTitle">
//!                 Dune
//!             </h1>
//!             <a class="bookPageGenreLink">Fiction</a>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let title = doc.first_text("h1#bookTitle").unwrap();
//! assert_eq!(title.map(|t| t.trim().to_string()), Some("Dune".to_string()));
//! ```

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::{FolioError, Result};

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| FolioError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Direct text-node children of `element`, in document order.
fn direct_texts(element: ElementRef<'_>) -> impl Iterator<Item = String> + '_ {
    element.children().filter_map(|child| match child.value() {
        Node::Text(text) => Some(text.to_string()),
        _ => None,
    })
}

/// Represents a parsed HTML document.
///
/// A Document wraps an HTML page together with the URL it was loaded from,
/// if known.
///
/// # Example
///
/// ```rust
/// use folio_core::parse::Document;
///
/// let html = r#"<h1 id="bookTitle">Dune</h1>"#;
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.first_text("h1#bookTitle").unwrap().as_deref(), Some("Dune"));
/// ```
pub struct Document {
    html: Html,
    url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_core::parse::Document;
    ///
    /// let html = "<html><body><h1>Title</h1></body></html>";
    /// let doc = Document::parse(html).unwrap();
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, url: None })
    }

    /// Parses HTML and records the address it was fetched from.
    pub fn parse_with_url(html: &str, url: Url) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, url: Some(url) })
    }

    /// Gets the source URL, if one was provided during parsing.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_core::parse::Document;
    ///
    /// let html = r#"<a class="bookTitle">First</a><a class="bookTitle">Second</a>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("a.bookTitle").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Returns the first direct text node of any element matching `selector`.
    ///
    /// Elements are visited in document order; the text is returned as-is,
    /// including surrounding whitespace.
    pub fn first_text(&self, selector: &str) -> Result<Option<String>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).flat_map(direct_texts).next())
    }

    /// Returns every direct text node of every element matching `selector`.
    pub fn all_texts(&self, selector: &str) -> Result<Vec<String>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).flat_map(direct_texts).collect())
    }

    /// Serializes the child nodes of every element matching `selector`.
    ///
    /// Text nodes come back as their text, element nodes as their outer
    /// HTML. Comments and other node kinds are skipped.
    pub fn child_nodes(&self, selector: &str) -> Result<Vec<String>> {
        let sel = compile(selector)?;
        Ok(self
            .html
            .select(&sel)
            .flat_map(|el| Element { element: el }.child_nodes())
            .collect())
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use folio_core::parse::Document;
///
/// let html = r#"<a class="bookTitle" href="/book/show/1">Dune</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Dune");
/// assert_eq!(link.attr("href"), Some("/book/show/1"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element and all its descendants.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    ///
    /// Returns `None` if the attribute is not present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// First direct text node of any descendant matching `selector`.
    pub fn first_text(&self, selector: &str) -> Result<Option<String>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).flat_map(direct_texts).next())
    }

    /// Serialized child nodes of this element (see [`Document::child_nodes`]).
    pub fn child_nodes(&self) -> Vec<String> {
        self.element
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(text.to_string()),
                Node::Element(_) => ElementRef::wrap(child).map(|el| el.html()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r##"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
        </head>
        <body>
            <h1 id="bookTitle">
                Heading
            </h1>
            <div id="bookMeta">
                <a href="#ratings">1,024 ratings</a>
                <a href="#reviews">
                    12 reviews
                </a>
            </div>
            <div id="description"><span>Intro <b>bold</b> outro<!-- note --></span></div>
        </body>
        </html>
    "##;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.select("a").unwrap().len(), 2);
        assert!(doc.url().is_none());
    }

    #[test]
    fn test_parse_with_url() {
        let url = Url::parse("https://example.com/book/show/1").unwrap();
        let doc = Document::parse_with_url(SAMPLE_HTML, url.clone()).unwrap();
        assert_eq!(doc.url(), Some(&url));
    }

    #[test]
    fn test_first_text_keeps_whitespace() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let text = doc.first_text("h1#bookTitle").unwrap().unwrap();
        assert!(text.starts_with('\n'));
        assert_eq!(text.trim(), "Heading");
    }

    #[test]
    fn test_first_text_missing() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.first_text("h2").unwrap(), None);
    }

    #[test]
    fn test_all_texts() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let texts = doc.all_texts("#bookMeta > a").unwrap();

        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], "1,024 ratings");
        assert_eq!(texts[1].trim(), "12 reviews");
    }

    #[test]
    fn test_child_nodes() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let nodes = doc.child_nodes("#description > span").unwrap();

        assert_eq!(nodes, vec!["Intro ".to_string(), "<b>bold</b>".to_string(), " outro".to_string()]);
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(FolioError::HtmlParseError(_))));
    }

    #[test]
    fn test_element_first_text_and_attr() {
        let doc = Document::parse(r#"<div class="row"><a href="/s/1">Dune #1</a> tail</div>"#).unwrap();
        let row = &doc.select("div.row").unwrap()[0];

        assert_eq!(row.first_text("a").unwrap().as_deref(), Some("Dune #1"));
        assert_eq!(row.text(), "Dune #1 tail");
        assert_eq!(doc.select("a").unwrap()[0].attr("href"), Some("/s/1"));
    }
}
