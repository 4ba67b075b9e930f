//! Book link discovery on list pages.
//!
//! A list page holds one `a.bookTitle` anchor per book; its `href` is
//! site-relative and gets resolved against the site root.

use url::Url;

use crate::Result;
use crate::parse::Document;

/// Anchor carrying a book detail-page link on a list page.
pub const BOOK_LINK: &str = "a.bookTitle";

/// Collects every book detail-page URL on a list page, in page order.
///
/// Anchors without an `href`, or with one that cannot be resolved against
/// `site_root`, are skipped.
///
/// # Example
///
/// ```rust
/// use folio_core::{Document, book_links};
/// use url::Url;
///
/// let html = r#"<a class="bookTitle" href="/book/show/2767052">The Hunger Games</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let root = Url::parse("https://www.goodreads.com").unwrap();
///
/// let links = book_links(&doc, &root).unwrap();
/// assert_eq!(links[0].as_str(), "https://www.goodreads.com/book/show/2767052");
/// ```
pub fn book_links(doc: &Document, site_root: &Url) -> Result<Vec<Url>> {
    let mut links = Vec::new();

    for anchor in doc.select(BOOK_LINK)? {
        let Some(href) = anchor.attr("href") else {
            tracing::debug!(text = anchor.text().trim(), "book anchor without href");
            continue;
        };
        match site_root.join(href.trim()) {
            Ok(url) => links.push(url),
            Err(err) => tracing::debug!(href, %err, "unresolvable book link"),
        }
    }

    Ok(links)
}

/// Address of one page of the book list, e.g. `...?page=3`.
///
/// Other query parameters are kept; a `page` already on `list_url` is replaced.
pub fn list_page_url(list_url: &Url, page: u32) -> Url {
    let kept: Vec<(String, String)> = list_url
        .query_pairs()
        .filter(|(key, _)| key.as_ref() != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = list_url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("page", &page.to_string());
    url
}
