use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Describes the site whose article namespace is searched.
///
/// Namespace names are locale specific (`Category:` on English Wikipedia,
/// `Категория:` on Russian Wikipedia), so they always come from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host of the site, e.g. `https://en.wikipedia.org`
    pub origin: String,

    /// Path prefix shared by all articles
    #[serde(default = "default_article_prefix")]
    pub article_prefix: String,

    /// Namespace names (with their trailing colon) that are not articles
    #[serde(default = "default_excluded_namespaces")]
    pub excluded_namespaces: Vec<String>,

    /// File suffixes that mark media rather than articles
    #[serde(default = "default_excluded_suffixes")]
    pub excluded_suffixes: Vec<String>,

    /// Extra regex patterns; a URL matching any of them is out of scope
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Stands in for spaces when a typed title becomes an article path
    #[serde(default = "default_title_space")]
    pub title_space: String,
}

/// Full configuration for one race between two pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceConfig {
    pub site: SiteConfig,

    /// Maximum number of links followed from start to target
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    /// Per-fetch deadline in seconds; 0 waits forever
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// User agent sent by the HTTP backend
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Render pages through this WebDriver server instead of plain HTTP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webdriver_url: Option<String>,
}

fn default_article_prefix() -> String {
    "/wiki/".to_string()
}

fn default_excluded_namespaces() -> Vec<String> {
    [
        "Wikipedia:",
        "Special:",
        "Category:",
        "File:",
        "Help:",
        "Portal:",
        "Template:",
        "Talk:",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_excluded_suffixes() -> Vec<String> {
    [".svg", ".jpg", ".jpeg", ".png", ".gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_title_space() -> String {
    "_".to_string()
}

fn default_max_hops() -> usize {
    3
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("wikirace/", env!("CARGO_PKG_VERSION")).to_string()
}

impl SiteConfig {
    /// Create a site configuration with default article prefix and exclusions
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            article_prefix: default_article_prefix(),
            excluded_namespaces: default_excluded_namespaces(),
            excluded_suffixes: default_excluded_suffixes(),
            exclude_patterns: Vec::new(),
            title_space: default_title_space(),
        }
    }

    /// Article path for a typed title, e.g. `New Zealand` to `/wiki/New_Zealand`
    pub fn article_path(&self, title: &str) -> String {
        format!(
            "{}{}",
            self.article_prefix,
            title.replace(' ', &self.title_space)
        )
    }

    /// Parsed origin, used as the base for resolving hrefs
    pub fn origin_url(&self) -> Result<Url> {
        let url = Url::parse(&self.origin)
            .map_err(|e| Error::Config(format!("invalid origin {:?}: {}", self.origin, e)))?;
        if url.cannot_be_a_base() || url.host().is_none() {
            return Err(Error::Config(format!(
                "origin {:?} must be an absolute http(s) URL",
                self.origin
            )));
        }
        Ok(url)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new("https://en.wikipedia.org")
    }
}

impl RaceConfig {
    /// Create a configuration for the given site with default limits
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            max_hops: default_max_hops(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
            webdriver_url: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.site.origin_url()?;
        Ok(config)
    }

    /// Per-fetch deadline, if one is configured
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::new(SiteConfig::default())
    }
}
