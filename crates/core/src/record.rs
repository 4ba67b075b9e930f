//! The book record produced by extraction and consumed by the recommender.

use serde::{Deserialize, Deserializer, Serialize};

/// Column names of the tabular output, in order, without `url`.
pub const COLUMNS: [&str; 10] = [
    "title",
    "original_title",
    "series",
    "language",
    "authors",
    "avg_rating",
    "num_ratings",
    "num_reviews",
    "genres",
    "description",
];

/// Column name appended when records carry their source address.
pub const URL_COLUMN: &str = "url";

/// One book, as scraped from its detail page.
///
/// List fields serialize as arrays (JSON output) but are read back from the
/// comma-joined form written to TSV/CSV tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// `name` or `name role`, in page order.
    #[serde(default, deserialize_with = "comma_list")]
    pub authors: Vec<String>,
    /// Average rating as printed on the page (e.g. `"4.27"`).
    #[serde(default)]
    pub avg_rating: Option<String>,
    #[serde(default)]
    pub num_ratings: Option<String>,
    #[serde(default)]
    pub num_reviews: Option<String>,
    #[serde(default, deserialize_with = "comma_list")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl BookRecord {
    /// Creates a record with only a title set.
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Default::default() }
    }

    /// Names of the optional fields that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("original_title", self.original_title.is_none()),
            ("series", self.series.is_none()),
            ("language", self.language.is_none()),
            ("authors", self.authors.is_empty()),
            ("avg_rating", self.avg_rating.is_none()),
            ("num_ratings", self.num_ratings.is_none()),
            ("num_reviews", self.num_reviews.is_none()),
            ("genres", self.genres.is_empty()),
            ("description", self.description.is_empty()),
        ];

        checks
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect()
    }

    /// Flattens the record into one table row matching [`COLUMNS`].
    ///
    /// Absent values become empty fields; list fields are joined with `,`.
    pub fn to_row(&self, include_url: bool) -> Vec<String> {
        let opt = |value: &Option<String>| value.clone().unwrap_or_default();

        let mut row = vec![
            self.title.clone(),
            opt(&self.original_title),
            opt(&self.series),
            opt(&self.language),
            self.authors.join(","),
            opt(&self.avg_rating),
            opt(&self.num_ratings),
            opt(&self.num_reviews),
            self.genres.join(","),
            self.description.clone(),
        ];
        if include_url {
            row.push(opt(&self.url));
        }
        row
    }
}

/// Header row for a table with or without the `url` column.
pub fn header(include_url: bool) -> Vec<&'static str> {
    let mut header = COLUMNS.to_vec();
    if include_url {
        header.push(URL_COLUMN);
    }
    header
}

fn comma_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let joined: Option<String> = Option::deserialize(deserializer)?;
    Ok(joined
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}
