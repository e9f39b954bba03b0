use crate::canonical::PageUrl;
use crate::config::SiteConfig;
use crate::error::Result;
use regex::Regex;

/// Decides whether a canonical page URL is an in-scope article.
///
/// All prefixes are precomputed against the site origin so the check is a
/// handful of string comparisons on the canonical form.
#[derive(Debug)]
pub struct LinkFilter {
    /// Bare origin, e.g. `https://en.wikipedia.org`
    origin: String,
    /// Origin joined with the article prefix
    article_root: String,
    /// Full prefixes of excluded namespaces
    excluded_prefixes: Vec<String>,
    excluded_suffixes: Vec<String>,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a new link filter from the site configuration
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let origin = site.origin_url()?.origin().ascii_serialization();
        let article_root = format!("{}{}", origin, site.article_prefix);

        let excluded_prefixes = site
            .excluded_namespaces
            .iter()
            .map(|ns| format!("{article_root}{ns}"))
            .collect();

        let mut exclude_regexes = Vec::with_capacity(site.exclude_patterns.len());
        for pattern in &site.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            origin,
            article_root,
            excluded_prefixes,
            excluded_suffixes: site.excluded_suffixes.clone(),
            exclude_regexes,
        })
    }

    /// Determine if a page is an article worth enqueueing
    pub fn is_in_scope(&self, page: &PageUrl) -> bool {
        let url = page.as_str();

        if self.is_bare_origin(url) {
            return false;
        }

        if !url.starts_with(&self.article_root) {
            return false;
        }

        if self.excluded_suffixes.iter().any(|s| url.ends_with(s.as_str())) {
            return false;
        }

        if self.excluded_prefixes.iter().any(|p| url.starts_with(p.as_str())) {
            return false;
        }

        !self.exclude_regexes.iter().any(|re| re.is_match(url))
    }

    /// Keep only in-scope pages, preserving order
    pub fn retain_in_scope(&self, pages: Vec<PageUrl>) -> Vec<PageUrl> {
        pages.into_iter().filter(|p| self.is_in_scope(p)).collect()
    }

    fn is_bare_origin(&self, url: &str) -> bool {
        url.strip_prefix(self.origin.as_str())
            .is_some_and(|rest| rest.is_empty() || rest == "/")
    }
}
