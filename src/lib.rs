//! Wiki link game solver: finds a shortest chain of article links between two
//! pages and recovers, for every hop, the paragraph holding the link.

pub mod canonical;
pub mod config;
pub mod error;
pub mod evidence;
pub mod fetch;
pub mod filter;
pub mod graph;
pub mod parsers;
pub mod results;
pub mod search;
pub mod utils;

// Re-export commonly used types for convenience
pub use canonical::PageUrl;
pub use config::{RaceConfig, SiteConfig};
pub use error::{Error, ErrorKind, Result};
pub use results::{HopReport, LinkEvidence, RaceReport, SearchOutcome, Trail};
pub use search::CancelToken;

use canonical::canonicalize;
use fetch::{FetchBackend, Fetcher};
use filter::LinkFilter;
use graph::WebGraph;

/// Main builder for a race between two pages
pub struct Wikirace {
    config: RaceConfig,
    cancel: CancelToken,
}

impl Wikirace {
    /// Create a new race builder with the given configuration
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Load configuration from a file
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(RaceConfig::from_file(path)?))
    }

    /// Load configuration from a JSON string
    pub fn from_config_str(json: &str) -> Result<Self> {
        Ok(Self::new(RaceConfig::from_json(json)?))
    }

    /// Set the maximum number of links followed
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.config.max_hops = max_hops;
        self
    }

    /// Set the per-fetch deadline; 0 disables it
    pub fn with_fetch_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.fetch_timeout_secs = timeout_seconds;
        self
    }

    /// Render pages through a WebDriver server
    pub fn with_webdriver(mut self, webdriver_url: &str) -> Self {
        self.config.webdriver_url = Some(webdriver_url.to_string());
        self
    }

    /// Use an externally owned cancellation token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Token that stops the search at the next frontier pop
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Turns operator input into a page.
    ///
    /// Absolute URLs are canonicalized as given; anything else is taken as
    /// an article title on the configured site, with spaces replaced the way
    /// the site spells them in links.
    pub fn page(&self, input: &str) -> Result<PageUrl> {
        let input = input.trim();
        if url::Url::parse(input).is_ok_and(|u| matches!(u.scheme(), "http" | "https")) {
            return PageUrl::parse(input);
        }
        let origin = self.config.site.origin_url()?;
        canonicalize(&self.config.site.article_path(input), &origin)
    }

    /// Run the race over HTTP or WebDriver, as configured
    pub async fn run(&self, start: &str, target: &str) -> Result<RaceReport> {
        let backend = FetchBackend::from_config(&self.config)?;
        let report = self.run_with(&backend, start, target).await;
        backend.close().await;
        report
    }

    /// Run the race with a caller-supplied fetcher.
    ///
    /// Only configuration and input problems are errors; an unreachable
    /// target is reported through the search outcome.
    pub async fn run_with<F: Fetcher>(
        &self,
        fetcher: &F,
        start: &str,
        target: &str,
    ) -> Result<RaceReport> {
        let start = self.page(start)?;
        let target = self.page(target)?;
        let origin = self.config.site.origin_url()?;
        let filter = LinkFilter::new(&self.config.site)?;
        let deadline = self.config.fetch_timeout();

        let graph = WebGraph::new(fetcher, &filter, &origin, deadline);
        let search =
            search::find_path(&graph, &start, &target, self.config.max_hops, &self.cancel).await;

        let hops = match &search.outcome {
            SearchOutcome::Found(trail) => {
                evidence::collect_evidence(fetcher, trail, &origin, deadline).await
            }
            _ => Vec::new(),
        };

        Ok(RaceReport {
            start,
            target,
            search,
            hops,
        })
    }
}
