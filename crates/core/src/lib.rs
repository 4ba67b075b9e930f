#[cfg(feature = "fetch")]
pub mod crawl;
pub mod description;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod links;
pub mod parse;
pub mod recommend;
pub mod record;
pub mod sink;

#[cfg(feature = "fetch")]
pub use crawl::{CrawlConfig, CrawlConfigBuilder, CrawlReport, CrawlSummary, Crawler};
pub use description::{normalize_fragment, normalize_fragments};
pub use error::{FolioError, Result};
pub use extract::{count_from_captions, extract_book, report_missing_fields, series_name};
pub use fetch::{Fetch, FetchConfig, fetch_file, fetch_stdin};
#[cfg(feature = "fetch")]
pub use fetch::{HttpFetcher, fetch_url};
pub use formatters::{JsonConfig, record_to_json, record_to_text, records_to_json};
pub use links::{book_links, list_page_url};
pub use parse::{Document, Element};
pub use recommend::{BookTable, Recommender, SimilarityMatrix, TOP_N};
pub use record::BookRecord;
pub use sink::RecordSink;
