//! Error types for Folio operations.
//!
//! This module defines the main error type [`FolioError`] which represents
//! all possible errors that can occur during fetching, extraction, output
//! writing and recommendation lookups.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{FolioError, Result};
//!
//! fn require_title(title: Option<&str>) -> Result<String> {
//!     match title {
//!         Some(title) => Ok(title.to_string()),
//!         None => Err(FolioError::MissingTitle { url: None }),
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Folio operations.
///
/// Field-level problems during extraction are never errors: they degrade the
/// field and emit a warning. Only a missing title turns into
/// [`FolioError::MissingTitle`], which callers treat as "skip this page".
#[derive(Error, Debug)]
pub enum FolioError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and non-success status codes.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The detail page has no title; the record is dropped.
    #[error("Missing book title ({})", url.as_deref().unwrap_or("<unknown url>"))]
    MissingTitle { url: Option<String> },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// Delimited output or input errors from the csv crate.
    #[error("Delimited data error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A preloaded artifact (book table or similarity matrix) is inconsistent.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid crawl configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for FolioError.
///
/// This is a convenience alias for `std::result::Result<T, FolioError>`.
pub type Result<T> = std::result::Result<T, FolioError>;
