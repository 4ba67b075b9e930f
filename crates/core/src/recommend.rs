//! Title search and similarity-ranked recommendations.
//!
//! Both inputs are loaded once and never change: a [`BookTable`] (the TSV or
//! CSV written by a crawl) and a square [`SimilarityMatrix`] whose row and
//! column order matches the table's row order.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{BookRecord, BookTable, Recommender, SimilarityMatrix};
//!
//! let table = BookTable::new(vec![BookRecord::new("A"), BookRecord::new("B"), BookRecord::new("C")]);
//! let matrix = SimilarityMatrix::new(vec![
//!     vec![1.0, 0.9, 0.2],
//!     vec![0.9, 1.0, 0.4],
//!     vec![0.2, 0.4, 1.0],
//! ]).unwrap();
//! let recommender = Recommender::new(table, matrix).unwrap();
//!
//! let titles: Vec<_> = recommender.recommend("A").unwrap().iter().map(|b| b.title.as_str()).collect();
//! assert_eq!(titles, vec!["B", "C"]);
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::record::BookRecord;
use crate::{FolioError, Result};

/// Number of recommendations returned by [`Recommender::recommend`].
pub const TOP_N: usize = 10;

/// Book rows in storage order.
#[derive(Debug, Clone, Default)]
pub struct BookTable {
    books: Vec<BookRecord>,
}

impl BookTable {
    pub fn new(books: Vec<BookRecord>) -> Self {
        Self { books }
    }

    /// Reads a table with a header row, as written by [`crate::RecordSink`].
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().delimiter(delimiter).from_reader(reader);

        let mut books = Vec::new();
        for row in reader.deserialize() {
            books.push(row?);
        }

        Ok(Self { books })
    }

    /// Reads a `.tsv` (tab-delimited) or any other file as comma-delimited.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FolioError::FileNotFound(path.to_path_buf()));
        }

        let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };
        let table = Self::from_reader(File::open(path)?, delimiter)?;
        tracing::info!(books = table.len(), path = %path.display(), "loaded book table");

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&BookRecord> {
        self.books.get(position)
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    /// Books whose title contains `query`, ignoring case, in storage order.
    pub fn search(&self, query: &str) -> Vec<&BookRecord> {
        let needle = query.to_lowercase();
        self.books
            .iter()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Titles matching `query` as in [`BookTable::search`], at most `limit`.
    pub fn autocomplete(&self, query: &str, limit: usize) -> Vec<&str> {
        self.search(query)
            .into_iter()
            .take(limit)
            .map(|book| book.title.as_str())
            .collect()
    }
}

/// Square matrix of pairwise similarity scores.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f32>>,
}

impl SimilarityMatrix {
    /// Wraps `rows`, which must form a square matrix.
    pub fn new(rows: Vec<Vec<f32>>) -> Result<Self> {
        let size = rows.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(FolioError::InvalidData(format!(
                "similarity row {} has {} columns, expected {}",
                idx,
                row.len(),
                size
            )));
        }

        Ok(Self { rows })
    }

    /// Reads headerless comma-separated rows of scores.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            let row = record
                .iter()
                .enumerate()
                .map(|(col_idx, field)| {
                    field.parse::<f32>().map_err(|e| {
                        FolioError::InvalidData(format!("similarity score at {}:{} ({:?}): {}", row_idx, col_idx, field, e))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }

        Self::new(rows)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FolioError::FileNotFound(path.to_path_buf()));
        }

        let matrix = Self::from_reader(File::open(path)?)?;
        tracing::info!(size = matrix.size(), path = %path.display(), "loaded similarity matrix");

        Ok(matrix)
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, position: usize) -> Option<&[f32]> {
        self.rows.get(position).map(Vec::as_slice)
    }
}

/// Read-only lookups over a book table and its similarity matrix.
#[derive(Debug, Clone)]
pub struct Recommender {
    table: BookTable,
    matrix: SimilarityMatrix,
    title_index: HashMap<String, usize>,
}

impl Recommender {
    /// Pairs a table with its matrix and indexes titles.
    ///
    /// When a title occurs more than once, its first row wins.
    pub fn new(table: BookTable, matrix: SimilarityMatrix) -> Result<Self> {
        if matrix.size() != table.len() {
            return Err(FolioError::InvalidData(format!(
                "similarity matrix is {0}x{0} but the book table has {1} rows",
                matrix.size(),
                table.len()
            )));
        }

        let mut title_index = HashMap::with_capacity(table.len());
        for (position, book) in table.books().iter().enumerate() {
            title_index.entry(book.title.clone()).or_insert(position);
        }

        Ok(Self { table, matrix, title_index })
    }

    /// Loads both artifacts from disk.
    pub fn load(books: &Path, similarity: &Path) -> Result<Self> {
        Self::new(BookTable::from_path(books)?, SimilarityMatrix::from_path(similarity)?)
    }

    pub fn table(&self) -> &BookTable {
        &self.table
    }

    /// Row position of an exact title.
    pub fn position(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// See [`BookTable::search`].
    pub fn search(&self, query: &str) -> Vec<&BookRecord> {
        self.table.search(query)
    }

    /// The [`TOP_N`] books most similar to `title`.
    ///
    /// Returns `None` when the title is not in the index.
    pub fn recommend(&self, title: &str) -> Option<Vec<&BookRecord>> {
        self.recommend_n(title, TOP_N)
    }

    /// Up to `n` books most similar to `title`, most similar first.
    ///
    /// Equal scores keep table order; NaN scores rank last. The queried book
    /// itself is never part of the result.
    pub fn recommend_n(&self, title: &str, n: usize) -> Option<Vec<&BookRecord>> {
        let Some(position) = self.position(title) else {
            tracing::warn!(title, "title not found in index");
            return None;
        };
        let scores = self.matrix.row(position)?;

        let mut ranked: Vec<usize> = (0..scores.len()).filter(|&other| other != position).collect();
        ranked.sort_by(|&a, &b| rank_score(scores[b]).total_cmp(&rank_score(scores[a])));

        Some(
            ranked
                .into_iter()
                .take(n)
                .filter_map(|other| self.table.get(other))
                .collect(),
        )
    }
}

fn rank_score(score: f32) -> f32 {
    if score.is_nan() { f32::NEG_INFINITY } else { score }
}
