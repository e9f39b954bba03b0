use crate::canonical::{PageUrl, canonicalize};
use crate::error::{Error, Result};
use crate::fetch::{Fetcher, fetch_page};
use crate::filter::LinkFilter;
use crate::parsers::{Document, extract_links};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// The implicit link graph: pages are nodes, in-scope links are edges.
///
/// Neighbors come back in the order the links appear on the page, duplicates
/// included; the search relies on that order for its tie-break.
#[allow(async_fn_in_trait)]
pub trait LinkGraph {
    async fn neighbors(&self, page: &PageUrl) -> Result<Vec<PageUrl>>;
}

/// Link graph backed by live pages: fetch, parse, extract, canonicalize, filter.
pub struct WebGraph<'a, F> {
    fetcher: &'a F,
    filter: &'a LinkFilter,
    origin: &'a Url,
    deadline: Option<Duration>,
}

impl<'a, F: Fetcher> WebGraph<'a, F> {
    pub fn new(
        fetcher: &'a F,
        filter: &'a LinkFilter,
        origin: &'a Url,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            fetcher,
            filter,
            origin,
            deadline,
        }
    }
}

impl<F: Fetcher> LinkGraph for WebGraph<'_, F> {
    async fn neighbors(&self, page: &PageUrl) -> Result<Vec<PageUrl>> {
        let body = fetch_page(self.fetcher, page, self.deadline).await?;
        let hrefs = extract_links(&Document::parse(&body));

        let mut pages = Vec::with_capacity(hrefs.len());
        for href in &hrefs {
            match canonicalize(href, self.origin) {
                Ok(link) if self.filter.is_in_scope(&link) => pages.push(link),
                Ok(link) => ::log::trace!("Link filter rejected: {}", link),
                Err(e) => ::log::debug!("Skipping link on {}: {}", page, e),
            }
        }

        ::log::debug!(
            "{} of {} links on {} are in scope",
            pages.len(),
            hrefs.len(),
            page
        );
        Ok(pages)
    }
}

/// A fixed in-memory graph.
///
/// Pages without an entry fail like an unreachable page would. Every
/// expansion is recorded so callers can check what was fetched and in which
/// order.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    edges: HashMap<PageUrl, Vec<PageUrl>>,
    expanded: Mutex<Vec<PageUrl>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the outgoing links of `page`, replacing any previous ones
    pub fn with_links(mut self, page: PageUrl, links: Vec<PageUrl>) -> Self {
        self.edges.insert(page, links);
        self
    }

    /// Pages whose neighbors were requested, in request order
    pub fn expanded(&self) -> Vec<PageUrl> {
        self.expanded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl LinkGraph for MemoryGraph {
    async fn neighbors(&self, page: &PageUrl) -> Result<Vec<PageUrl>> {
        if let Ok(mut expanded) = self.expanded.lock() {
            expanded.push(page.clone());
        }
        self.edges
            .get(page)
            .cloned()
            .ok_or_else(|| Error::Status {
                url: page.to_string(),
                status: 404,
            })
    }
}
