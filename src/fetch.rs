use crate::canonical::PageUrl;
use crate::config::RaceConfig;
use crate::error::{Error, Result};
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// Raw response for one page
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Retrieves the markup of a page.
///
/// Implementations report transport failures as errors and leave status
/// handling to [`fetch_page`].
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, url: &PageUrl) -> Result<Fetched>;
}

/// Fetches `url`, bounding the wait by `deadline` and rejecting non-2xx statuses.
///
/// No retries: a failed fetch abandons whatever branch asked for it.
pub async fn fetch_page<F: Fetcher>(
    fetcher: &F,
    url: &PageUrl,
    deadline: Option<Duration>,
) -> Result<Vec<u8>> {
    let fetched = match deadline {
        Some(limit) => timeout(limit, fetcher.fetch(url))
            .await
            .map_err(|_| Error::Timeout {
                url: url.to_string(),
                secs: limit.as_secs(),
            })??,
        None => fetcher.fetch(url).await?,
    };

    if !(200..300).contains(&fetched.status) {
        ::log::warn!("Non-OK HTTP status: {} for URL {}", fetched.status, url);
        return Err(Error::Status {
            url: url.to_string(),
            status: fetched.status,
        });
    }

    ::log::trace!("Fetched {} bytes from {}", fetched.body.len(), url);
    Ok(fetched.body)
}

/// Plain HTTP backend
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &PageUrl) -> Result<Fetched> {
        let transport = |e: reqwest::Error| Error::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url.location().as_str())
            .send()
            .await
            .map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport)?;

        Ok(Fetched {
            status,
            body: body.to_vec(),
        })
    }
}

/// Renders pages through a WebDriver server.
///
/// The session is opened on first use and reused for every later fetch.
/// WebDriver does not expose response codes, so a successful navigation is
/// reported as 200.
pub struct WebDriverFetcher {
    webdriver_url: String,
    client: Mutex<Option<Client>>,
}

impl WebDriverFetcher {
    pub fn new(webdriver_url: &str) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            client: Mutex::new(None),
        }
    }

    async fn session(&self) -> Result<Client> {
        let mut guard = self.client.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        ::log::debug!("Connecting to WebDriver at {}", self.webdriver_url);
        let client = ClientBuilder::native()
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| Error::Transport {
                url: self.webdriver_url.clone(),
                reason: format!("failed to connect to WebDriver: {e}"),
            })?;
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Ends the WebDriver session, if one was opened
    pub async fn close(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }
    }
}

impl Fetcher for WebDriverFetcher {
    async fn fetch(&self, url: &PageUrl) -> Result<Fetched> {
        let client = self.session().await?;
        let navigation = |context: &str, e: fantoccini::error::CmdError| Error::Transport {
            url: url.to_string(),
            reason: format!("{context}: {e}"),
        };

        client
            .goto(url.location().as_str())
            .await
            .map_err(|e| navigation("navigation failed", e))?;
        let source = client
            .source()
            .await
            .map_err(|e| navigation("reading page source failed", e))?;

        Ok(Fetched {
            status: 200,
            body: source.into_bytes(),
        })
    }
}

/// Backend chosen at runtime from configuration
pub enum FetchBackend {
    Http(HttpFetcher),
    WebDriver(WebDriverFetcher),
}

impl FetchBackend {
    pub fn from_config(config: &RaceConfig) -> Result<Self> {
        match config.webdriver_url.as_deref() {
            Some(webdriver_url) if !webdriver_url.is_empty() => {
                ::log::info!("Fetching pages through WebDriver at {}", webdriver_url);
                Ok(Self::WebDriver(WebDriverFetcher::new(webdriver_url)))
            }
            _ => Ok(Self::Http(HttpFetcher::new(&config.user_agent)?)),
        }
    }

    /// Releases backend resources
    pub async fn close(&self) {
        if let Self::WebDriver(fetcher) = self {
            fetcher.close().await;
        }
    }
}

impl Fetcher for FetchBackend {
    async fn fetch(&self, url: &PageUrl) -> Result<Fetched> {
        match self {
            Self::Http(fetcher) => fetcher.fetch(url).await,
            Self::WebDriver(fetcher) => fetcher.fetch(url).await,
        }
    }
}

/// In-memory fetcher serving fixed pages, keyed by canonical URL.
///
/// Unknown pages answer 404. Every request is recorded.
#[cfg(test)]
pub(crate) struct StaticFetcher {
    pages: std::collections::HashMap<String, (u16, Vec<u8>)>,
    requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl StaticFetcher {
    pub(crate) fn new() -> Self {
        Self {
            pages: std::collections::HashMap::new(),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn page(self, url: &str, html: &str) -> Self {
        self.bytes(url, html.as_bytes())
    }

    /// Serves `body` exactly as given, whatever its encoding
    pub(crate) fn bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.pages.insert(url.to_string(), (200, body.to_vec()));
        self
    }

    pub(crate) fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), (status, Vec::new()));
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &PageUrl) -> Result<Fetched> {
        self.requests.lock().unwrap().push(url.to_string());
        let (status, body) = self
            .pages
            .get(url.as_str())
            .cloned()
            .unwrap_or((404, Vec::new()));
        Ok(Fetched { status, body })
    }
}
