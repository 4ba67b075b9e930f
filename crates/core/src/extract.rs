//! Book detail-page extraction.
//!
//! [`extract_book`] turns one parsed detail page into a [`BookRecord`]. The
//! title is the only required field; every other field falls back to
//! `None`/empty and is reported once, after extraction, as a warning.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Document, extract_book};
//!
//! let html = r#"
//!     <h1 id="bookTitle">  Dune  </h1>
//!     <span itemprop="ratingValue"> 4.27 </span>
//! "#;
//! let doc = Document::parse(html).unwrap();
//! let book = extract_book(&doc).unwrap();
//!
//! assert_eq!(book.title, "Dune");
//! assert_eq!(book.avg_rating.as_deref(), Some("4.27"));
//! ```

use crate::description::normalize_fragments;
use crate::parse::{Document, Element};
use crate::record::BookRecord;
use crate::{FolioError, Result};

/// CSS selectors for the fields of a detail page.
pub mod selectors {
    pub const TITLE: &str = "h1#bookTitle";
    pub const DATA_ROWS: &str = "#bookDataBox > div.clearFloats";
    pub const ROW_LABEL: &str = ".infoBoxRowTitle";
    pub const ROW_VALUE: &str = ".infoBoxRowItem";
    pub const ROW_LINK: &str = ".infoBoxRowItem > a";
    pub const AUTHOR: &str = ".authorName__container";
    pub const AUTHOR_NAME: &str = "a > span";
    pub const AUTHOR_ROLE: &str = ".role";
    pub const AVG_RATING: &str = r#"span[itemprop="ratingValue"]"#;
    pub const META_CAPTIONS: &str = "#bookMeta > a";
    pub const GENRES: &str = "div.left > a.bookPageGenreLink";
    /// Collapsed block holding the full text of long descriptions.
    pub const DESCRIPTION_FULL: &str = r#"#description > span[style*="display:none"]"#;
    pub const DESCRIPTION: &str = "#description > span";
}

type RowSetter = fn(&mut BookRecord, &Element<'_>) -> Result<()>;

/// Metadata rows we understand, keyed by their exact label.
const DATA_ROW_SETTERS: [(&str, RowSetter); 3] = [
    ("Original Title", set_original_title),
    ("Series", set_series),
    ("Edition Language", set_language),
];

/// Extracts a book record from a detail page.
///
/// The record's `url` is taken from the document's source URL, if any.
///
/// # Errors
///
/// Returns [`FolioError::MissingTitle`] when the page has no title; the page
/// should be skipped.
pub fn extract_book(doc: &Document) -> Result<BookRecord> {
    let url = doc.url().map(|u| u.to_string());

    let Some(title) = clean(doc.first_text(selectors::TITLE)?) else {
        tracing::error!(url = url.as_deref().unwrap_or("-"), "missing book title; skipping page");
        return Err(FolioError::MissingTitle { url });
    };

    let mut book = BookRecord::new(title);

    for row in doc.select(selectors::DATA_ROWS)? {
        let Some(label) = row.first_text(selectors::ROW_LABEL)? else {
            continue;
        };
        if let Some((_, setter)) = DATA_ROW_SETTERS.iter().find(|(known, _)| *known == label) {
            setter(&mut book, &row)?;
        }
    }

    book.authors = extract_authors(doc)?;
    book.avg_rating = clean(doc.first_text(selectors::AVG_RATING)?);

    let captions = doc.all_texts(selectors::META_CAPTIONS)?;
    book.num_ratings = count_from_captions(&captions, "ratings", "rating");
    book.num_reviews = count_from_captions(&captions, "reviews", "review");

    book.genres = doc
        .all_texts(selectors::GENRES)?
        .into_iter()
        .filter_map(|genre| clean(Some(genre)))
        .collect();

    book.description = extract_description(doc)?;
    book.url = url;

    report_missing_fields(&book);

    Ok(book)
}

/// Emits one warning per absent optional field.
pub fn report_missing_fields(book: &BookRecord) {
    let url = book.url.as_deref().unwrap_or("-");
    for field in book.missing_fields() {
        tracing::warn!(field, url, "book missing field");
    }
}

fn set_original_title(book: &mut BookRecord, row: &Element<'_>) -> Result<()> {
    book.original_title = clean(row.first_text(selectors::ROW_VALUE)?);
    Ok(())
}

fn set_series(book: &mut BookRecord, row: &Element<'_>) -> Result<()> {
    book.series = row.first_text(selectors::ROW_LINK)?.as_deref().and_then(series_name);
    Ok(())
}

fn set_language(book: &mut BookRecord, row: &Element<'_>) -> Result<()> {
    book.language = clean(row.first_text(selectors::ROW_VALUE)?);
    Ok(())
}

/// Drops the ` #n` position suffix from a series link, e.g. `"Dune #1"` → `"Dune"`.
///
/// The character right before `#` is the separating space and goes too.
pub fn series_name(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let name = match raw.find('#') {
        Some(idx) => {
            let cut = raw[..idx].char_indices().last().map_or(0, |(i, _)| i);
            &raw[..cut]
        }
        None => raw,
    };
    clean(Some(name.to_string()))
}

fn extract_authors(doc: &Document) -> Result<Vec<String>> {
    let mut authors = Vec::new();

    for container in doc.select(selectors::AUTHOR)? {
        let Some(name) = clean(container.first_text(selectors::AUTHOR_NAME)?) else {
            tracing::debug!("author entry without a name");
            continue;
        };
        match clean(container.first_text(selectors::AUTHOR_ROLE)?) {
            Some(role) => authors.push(format!("{} {}", name, role)),
            None => authors.push(name),
        }
    }

    Ok(authors)
}

/// Picks the first caption mentioning `singular` and reduces it to its number.
///
/// Rating and review counts share one flat list of link captions; the word in
/// the caption is the only thing telling them apart.
pub fn count_from_captions<S: AsRef<str>>(captions: &[S], plural: &str, singular: &str) -> Option<String> {
    let caption = captions
        .iter()
        .map(|caption| caption.as_ref())
        .find(|caption: &&str| caption.contains(plural) || caption.contains(singular))?;

    let digits = caption
        .replace('\n', "")
        .replace(',', "")
        .replace(plural, "")
        .replace(singular, "");
    clean(Some(digits))
}

/// Full description when the page collapses it, the visible block otherwise.
fn extract_description(doc: &Document) -> Result<String> {
    let full = normalize_fragments(doc.child_nodes(selectors::DESCRIPTION_FULL)?);
    if !full.is_empty() {
        return Ok(full);
    }

    Ok(normalize_fragments(doc.child_nodes(selectors::DESCRIPTION)?))
}

/// Trims and turns blank text into `None`.
fn clean(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
