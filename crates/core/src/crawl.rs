//! List-page crawling and detail-page scheduling.
//!
//! The crawl walks an inclusive range of list pages. Every request, list page
//! or detail page, waits for one shared fixed delay before dispatch; nothing
//! is retried. Detail pages are fetched and extracted in spawned tasks whose
//! results flow through a channel to a single owner of the [`RecordSink`].
//!
//! # Example
//!
//! ```rust,no_run
//! use folio_core::{CrawlConfig, Crawler};
//!
//! # #[tokio::main]
//! # async fn main() -> folio_core::Result<()> {
//! let config = CrawlConfig::builder().pages(1, 2).build();
//! let crawler = Crawler::with_http(config.clone())?;
//! let report = crawler.run().await?;
//! report.sink.write_outputs(&config.output_dir, config.start_page, config.end_page)?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use url::Url;

use crate::extract::extract_book;
use crate::fetch::{Fetch, FetchConfig, HttpFetcher};
use crate::links::{book_links, list_page_url};
use crate::parse::Document;
use crate::record::BookRecord;
use crate::sink::RecordSink;
use crate::{FolioError, Result};

/// The list whose pages are crawled by default.
pub const DEFAULT_LIST_URL: &str = "https://www.goodreads.com/list/show/1.Best_Books_Ever";
/// Base for resolving the site-relative book links found on list pages.
pub const DEFAULT_SITE_ROOT: &str = "https://www.goodreads.com";

/// Crawl settings.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// First list page, inclusive (default: 1).
    pub start_page: u32,
    /// Last list page, inclusive (default: 100).
    pub end_page: u32,
    /// Pause between consecutive requests (default: 250ms).
    pub delay: Duration,
    /// List address; `page=N` is appended per page.
    pub list_url: String,
    /// Base for resolving book links.
    pub site_root: String,
    /// Directory receiving the TSV/CSV tables (default: `output`).
    pub output_dir: PathBuf,
    pub fetch: FetchConfig,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            end_page: 100,
            delay: Duration::from_millis(250),
            list_url: DEFAULT_LIST_URL.to_string(),
            site_root: DEFAULT_SITE_ROOT.to_string(),
            output_dir: PathBuf::from("output"),
            fetch: FetchConfig::default(),
        }
    }
}

impl CrawlConfig {
    /// Creates a new builder for CrawlConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_core::CrawlConfig;
    /// use std::time::Duration;
    ///
    /// let config = CrawlConfig::builder().pages(3, 5).delay(Duration::from_millis(500)).build();
    /// assert_eq!(config.start_page, 3);
    /// ```
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder::new()
    }

    /// Checks the page range and parses both addresses.
    fn resolve(&self) -> Result<(Url, Url)> {
        if self.start_page > self.end_page {
            return Err(FolioError::ConfigError(format!(
                "start page {} is after end page {}",
                self.start_page, self.end_page
            )));
        }

        let list_url = Url::parse(&self.list_url).map_err(|e| FolioError::InvalidUrl(format!("list url: {}", e)))?;
        let site_root =
            Url::parse(&self.site_root).map_err(|e| FolioError::InvalidUrl(format!("site root: {}", e)))?;

        Ok((list_url, site_root))
    }
}

/// Builder for CrawlConfig.
pub struct CrawlConfigBuilder {
    config: CrawlConfig,
}

impl CrawlConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: CrawlConfig::default() }
    }

    /// Sets the inclusive list-page range.
    pub fn pages(mut self, start: u32, end: u32) -> Self {
        self.config.start_page = start;
        self.config.end_page = end;
        self
    }

    /// Sets the delay between requests.
    pub fn delay(mut self, value: Duration) -> Self {
        self.config.delay = value;
        self
    }

    pub fn list_url(mut self, value: impl Into<String>) -> Self {
        self.config.list_url = value.into();
        self
    }

    pub fn site_root(mut self, value: impl Into<String>) -> Self {
        self.config.site_root = value.into();
        self
    }

    pub fn output_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.output_dir = value.into();
        self
    }

    pub fn fetch(mut self, value: FetchConfig) -> Self {
        self.config.fetch = value;
        self
    }

    /// Builds the CrawlConfig.
    pub fn build(self) -> CrawlConfig {
        self.config
    }
}

impl Default for CrawlConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters for one crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub books_discovered: usize,
    pub books_extracted: usize,
    /// Detail pages dropped for lacking a title.
    pub books_skipped: usize,
    /// Detail pages that could not be fetched or parsed.
    pub books_failed: usize,
}

/// Result of [`Crawler::run`].
#[derive(Debug)]
pub struct CrawlReport {
    pub sink: RecordSink,
    pub summary: CrawlSummary,
}

enum Outcome {
    Extracted(BookRecord),
    Skipped,
    Failed,
}

/// Enforces the fixed pause between dispatches.
struct Throttle {
    delay: Duration,
    last: Option<Instant>,
}

impl Throttle {
    fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    async fn wait(&mut self) {
        if let Some(last) = self.last {
            sleep_until(last + self.delay).await;
        }
        self.last = Some(Instant::now());
    }
}

/// Crawls list pages and extracts every linked book.
pub struct Crawler<F> {
    config: CrawlConfig,
    list_url: Url,
    site_root: Url,
    fetcher: Arc<F>,
}

impl Crawler<HttpFetcher> {
    /// Crawler fetching over HTTP with `config.fetch`.
    pub fn with_http(config: CrawlConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Self::new(config, fetcher)
    }
}

impl<F: Fetch + 'static> Crawler<F> {
    /// Validates the configuration and wraps `fetcher`.
    pub fn new(config: CrawlConfig, fetcher: F) -> Result<Self> {
        let (list_url, site_root) = config.resolve()?;
        Ok(Self { config, list_url, site_root, fetcher: Arc::new(fetcher) })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs the crawl to completion and returns the collected table.
    ///
    /// Failed fetches are logged and counted, never retried; whatever was
    /// extracted is kept.
    pub async fn run(&self) -> Result<CrawlReport> {
        let mut summary = CrawlSummary::default();
        let mut throttle = Throttle::new(self.config.delay);
        let mut tasks = JoinSet::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        for page in self.config.start_page..=self.config.end_page {
            let page_url = list_page_url(&self.list_url, page);

            throttle.wait().await;
            tracing::info!(page, url = %page_url, "fetching list page");

            let html = match self.fetcher.fetch(&page_url).await {
                Ok(html) => html,
                Err(err) => {
                    tracing::warn!(page, url = %page_url, %err, "list page fetch failed");
                    summary.pages_failed += 1;
                    continue;
                }
            };

            let links = match discover_links(&html, &self.site_root) {
                Ok(links) => links,
                Err(err) => {
                    tracing::warn!(page, %err, "list page could not be parsed");
                    summary.pages_failed += 1;
                    continue;
                }
            };
            summary.pages_fetched += 1;
            summary.books_discovered += links.len();
            tracing::debug!(page, books = links.len(), "discovered book links");

            for link in links {
                throttle.wait().await;

                let fetcher = Arc::clone(&self.fetcher);
                let tx = tx.clone();
                tasks.spawn(async move {
                    let outcome = match fetcher.fetch(&link).await {
                        Ok(html) => extract_page(&html, link),
                        Err(err) => {
                            tracing::warn!(url = %link, %err, "book page fetch failed");
                            Outcome::Failed
                        }
                    };
                    // The receiver lives until every sender is gone.
                    let _ = tx.send(outcome);
                });
            }
        }
        drop(tx);

        let mut sink = RecordSink::new(true);
        while let Some(outcome) = rx.recv().await {
            match outcome {
                Outcome::Extracted(record) => {
                    summary.books_extracted += 1;
                    sink.append(record);
                }
                Outcome::Skipped => summary.books_skipped += 1,
                Outcome::Failed => summary.books_failed += 1,
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                tracing::error!(%err, "book task aborted");
                summary.books_failed += 1;
            }
        }

        tracing::info!(
            pages = summary.pages_fetched,
            books = summary.books_extracted,
            skipped = summary.books_skipped,
            failed = summary.books_failed + summary.pages_failed,
            "crawl finished"
        );

        Ok(CrawlReport { sink, summary })
    }
}

fn discover_links(html: &str, site_root: &Url) -> Result<Vec<Url>> {
    let doc = Document::parse(html)?;
    book_links(&doc, site_root)
}

fn extract_page(html: &str, url: Url) -> Outcome {
    let extracted = Document::parse_with_url(html, url.clone()).and_then(|doc| extract_book(&doc));
    match extracted {
        Ok(record) => Outcome::Extracted(record),
        Err(FolioError::MissingTitle { .. }) => Outcome::Skipped,
        Err(err) => {
            tracing::warn!(url = %url, %err, "book page could not be parsed");
            Outcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const LIST_URL: &str = "https://books.example/list/show/1.Best";
    const ROOT: &str = "https://books.example";

    #[derive(Default)]
    struct MapFetcher {
        pages: HashMap<String, String>,
    }

    impl MapFetcher {
        fn with(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    impl Fetch for MapFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or(FolioError::Timeout { timeout: 0 })
        }
    }

    fn list_page(hrefs: &[&str]) -> String {
        hrefs
            .iter()
            .map(|href| format!(r#"<tr><td><a class="bookTitle" href="{}">Book</a></td></tr>"#, href))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn book_page(title: &str) -> String {
        format!(r#"<h1 id="bookTitle">{}</h1><div class="left"><a class="bookPageGenreLink">Fiction</a></div>"#, title)
    }

    fn config(start: u32, end: u32) -> CrawlConfig {
        CrawlConfig::builder()
            .pages(start, end)
            .delay(Duration::ZERO)
            .list_url(LIST_URL)
            .site_root(ROOT)
            .build()
    }

    #[tokio::test]
    async fn test_crawl_collects_books() {
        let fetcher = MapFetcher::default()
            .with(&format!("{}?page=1", LIST_URL), &list_page(&["/book/show/1", "/book/show/2"]))
            .with(&format!("{}?page=2", LIST_URL), &list_page(&["/book/show/3"]))
            .with("https://books.example/book/show/1", &book_page("One"))
            .with("https://books.example/book/show/2", &book_page("Two"))
            .with("https://books.example/book/show/3", &book_page("Three"));

        let report = Crawler::new(config(1, 2), fetcher).unwrap().run().await.unwrap();

        assert_eq!(report.summary.pages_fetched, 2);
        assert_eq!(report.summary.books_discovered, 3);
        assert_eq!(report.summary.books_extracted, 3);

        let mut titles: Vec<_> = report.sink.records().iter().map(|r| r.title.clone()).collect();
        titles.sort();
        assert_eq!(titles, vec!["One", "Three", "Two"]);

        let one = report.sink.records().iter().find(|r| r.title == "One").unwrap();
        assert_eq!(one.url.as_deref(), Some("https://books.example/book/show/1"));
        assert_eq!(one.genres, vec!["Fiction"]);
    }

    #[tokio::test]
    async fn test_crawl_keeps_partial_results() {
        let fetcher = MapFetcher::default()
            .with(
                &format!("{}?page=1", LIST_URL),
                &list_page(&["/book/show/1", "/book/show/missing", "/book/show/untitled"]),
            )
            .with("https://books.example/book/show/1", &book_page("One"))
            .with("https://books.example/book/show/untitled", "<p>no heading</p>");

        let report = Crawler::new(config(1, 2), fetcher).unwrap().run().await.unwrap();

        assert_eq!(
            report.summary,
            CrawlSummary {
                pages_fetched: 1,
                pages_failed: 1,
                books_discovered: 3,
                books_extracted: 1,
                books_skipped: 1,
                books_failed: 1,
            }
        );
        assert_eq!(report.sink.len(), 1);
        assert_eq!(report.sink.records()[0].title, "One");
    }

    #[tokio::test]
    async fn test_crawl_waits_between_requests() {
        let fetcher = MapFetcher::default()
            .with(&format!("{}?page=1", LIST_URL), &list_page(&["/book/show/1"]))
            .with("https://books.example/book/show/1", &book_page("One"));
        let config = CrawlConfig { delay: Duration::from_millis(40), ..config(1, 2) };

        let started = std::time::Instant::now();
        Crawler::new(config, fetcher).unwrap().run().await.unwrap();

        // Three dispatches: two list pages and one book page.
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn test_invalid_page_range() {
        let result = Crawler::new(config(5, 4), MapFetcher::default());
        assert!(matches!(result, Err(FolioError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_list_url() {
        let config = CrawlConfig { list_url: "not a url".to_string(), ..config(1, 1) };
        let result = Crawler::new(config, MapFetcher::default());
        assert!(matches!(result, Err(FolioError::InvalidUrl(_))));
    }

    #[test]
    fn test_config_defaults() {
        let config = CrawlConfig::default();
        assert_eq!((config.start_page, config.end_page), (1, 100));
        assert_eq!(config.delay, Duration::from_millis(250));
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }
}
