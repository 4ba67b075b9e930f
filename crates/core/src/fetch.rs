//! Content fetching from URLs, files, and stdin.
//!
//! The crawler talks to the network through the [`Fetch`] trait so it can be
//! driven by anything that turns a URL into HTML; [`HttpFetcher`] is the
//! reqwest-backed implementation.

use std::fs;
use std::future::Future;
use std::path::PathBuf;

use url::Url;

use crate::{FolioError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Folio/0.1)".to_string() }
    }
}

/// A source of HTML pages.
pub trait Fetch: Send + Sync {
    /// Retrieves the body of `url` as text.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;
}

#[cfg(feature = "fetch")]
pub use http::{HttpFetcher, fetch_url};

#[cfg(feature = "fetch")]
mod http {
    use std::time::Duration;

    use reqwest::Client;
    use url::Url;

    use super::{Fetch, FetchConfig};
    use crate::{FolioError, Result};

    /// Fetches pages over HTTP with one shared connection pool.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
        timeout: u64,
    }

    impl HttpFetcher {
        /// Builds a client with the configured timeout and User-Agent.
        pub fn new(config: &FetchConfig) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(config.timeout))
                .user_agent(config.user_agent.clone())
                .build()
                .map_err(FolioError::HttpError)?;

            Ok(Self { client, timeout: config.timeout })
        }
    }

    impl Fetch for HttpFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            let response = self
                .client
                .get(url.clone())
                .header(
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                )
                .header("Accept-Language", "en-US,en;q=0.9")
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() { FolioError::Timeout { timeout: self.timeout } } else { FolioError::HttpError(e) }
                })?
                .error_for_status()?;

            Ok(response.text().await?)
        }
    }

    /// Fetches HTML content from a single URL.
    ///
    /// Builds a one-off client; use [`HttpFetcher`] when fetching many pages.
    pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
        let parsed_url = Url::parse(url).map_err(|e| FolioError::InvalidUrl(e.to_string()))?;

        if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
            return Err(FolioError::InvalidUrl(format!(
                "URL must use http:// or https://, got {}",
                parsed_url.scheme()
            )));
        }

        HttpFetcher::new(config)?.fetch(&parsed_url).await
    }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(FolioError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(FolioError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(FolioError::from)?;

    Ok(buffer)
}
