use crate::config::WebFetcherConfig;
use crate::crawlers::fetcher::Fetcher;
use crate::error::FetchError;
use crate::filter::UrlFilter;
use crate::parsers::{Parser, ParserType};
use crate::results::PageResult;
use crate::utils::calculate_timeout;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

/// Endpoints tried when the configured WebDriver URL refuses the connection
const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Fetches pages by rendering them in a browser driven over WebDriver.
///
/// One browser session serves one invocation. Call [`Fetcher::close`] when
/// done; the session stays open on the WebDriver server otherwise.
pub struct WebDriverFetcher {
    client: Option<Client>,
    config: WebFetcherConfig,
    link_filter: Option<UrlFilter>,
}

impl WebDriverFetcher {
    /// Open a browser session
    pub async fn connect(config: &WebFetcherConfig) -> Result<Self, FetchError> {
        let client = connect_to_webdriver(config).await?;
        Ok(Self {
            client: Some(client),
            config: config.clone(),
            link_filter: None,
        })
    }

    /// Only report discovered links the filter accepts. Without a filter
    /// every http(s) link is reported.
    pub fn with_link_filter(mut self, filter: UrlFilter) -> Self {
        self.link_filter = Some(filter);
        self
    }

    async fn fetch_once(&self, url: &str) -> Result<PageResult, FetchError> {
        let client = self
            .client
            .clone()
            .ok_or_else(|| FetchError::SessionLost { url: url.to_string() })?;

        let limit = calculate_timeout(self.config.page_timeout_secs, url.len());
        match timeout(limit, self.scrape(&client, url)).await {
            Ok(result) => result,
            Err(_) => {
                ::log::error!("Timeout scraping: {}", url);
                Err(FetchError::Timeout {
                    url: url.to_string(),
                    secs: limit.as_secs(),
                })
            }
        }
    }

    /// Navigates to a URL and extracts the rendered page
    async fn scrape(&self, client: &Client, url: &str) -> Result<PageResult, FetchError> {
        let started = Instant::now();
        ::log::debug!("SCRAPE: {}", url);

        if let Err(e) = client.goto(url).await {
            if is_session_error(&e) {
                ::log::warn!("Lost session while accessing {}", url);
                return Err(FetchError::SessionLost { url: url.to_string() });
            }
            // The browser is fine; the page itself didn't load
            ::log::warn!("Failed to access {}: {}", url, e);
            return Ok(PageResult::failure(url, e.to_string()));
        }

        if let Some(selector) = &self.config.wait_for_selector {
            let waited = client
                .wait()
                .at_most(Duration::from_secs(self.config.page_timeout_secs))
                .for_element(Locator::Css(selector))
                .await;
            if let Err(e) = waited {
                if is_session_error(&e) {
                    return Err(FetchError::SessionLost { url: url.to_string() });
                }
                ::log::debug!("{} never matched {:?}, extracting anyway", url, selector);
            }
        }

        let final_url = client
            .current_url()
            .await
            .map_err(|e| command_error(e, url))?;
        let source = client.source().await.map_err(|e| command_error(e, url))?;

        let parser_type = ParserType::from_url(final_url.as_str());
        let parsed = Parser::parse(&source, parser_type);
        let links = if parser_type.should_extract_links() {
            self.resolve_links(&final_url, &parsed.links)
        } else {
            Vec::new()
        };

        ::log::info!("Found {} links in {}", links.len(), final_url);
        ::log::debug!(
            "Processed {} in {:.2} seconds",
            final_url,
            started.elapsed().as_secs_f64()
        );

        Ok(PageResult::success(
            final_url.as_str(),
            parsed.title,
            parsed.content,
            links,
        ))
    }

    /// Absolute, in-scope, fragment-free links in first-seen order
    fn resolve_links(&self, base: &Url, hrefs: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        hrefs
            .iter()
            .filter_map(|href| base.join(href).ok())
            .filter(|link| match &self.link_filter {
                Some(filter) => filter.should_crawl(link),
                None => matches!(link.scheme(), "http" | "https"),
            })
            .map(|mut link| {
                link.set_fragment(None);
                link.to_string()
            })
            .filter(|link| seen.insert(link.clone()))
            .collect()
    }

    /// Replaces the session with a fresh one
    async fn reconnect(&mut self) -> Result<(), FetchError> {
        ::log::warn!("Attempting to reconnect WebDriver session");
        if let Some(old) = self.client.take() {
            // The old session is most likely gone already
            let _ = old.close().await;
        }
        let client = connect_to_webdriver(&self.config).await?;
        self.client = Some(client);
        ::log::info!("Successfully reconnected to WebDriver");
        Ok(())
    }
}

#[async_trait]
impl Fetcher for WebDriverFetcher {
    async fn fetch(&mut self, url: &str) -> Result<PageResult, FetchError> {
        match self.fetch_once(url).await {
            Err(FetchError::SessionLost { .. }) if self.config.retry_lost_session => {
                self.reconnect().await?;
                self.fetch_once(url).await
            }
            other => other,
        }
    }

    async fn close(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver client: {}", e);
            } else {
                ::log::debug!("Closed WebDriver session");
            }
        }
    }
}

/// Browser capabilities for the configured mode
fn capabilities(config: &WebFetcherConfig) -> Map<String, Value> {
    let mut caps = Map::new();
    if config.headless {
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": ["--headless=new", "--disable-gpu", "--no-sandbox"] }),
        );
        caps.insert(
            "moz:firefoxOptions".to_string(),
            json!({ "args": ["-headless"] }),
        );
    }
    caps
}

async fn try_connect(webdriver_url: &str, caps: &Map<String, Value>) -> Option<Client> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(caps.clone());
    match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            Some(client)
        }
        Err(e) => {
            ::log::debug!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            None
        }
    }
}

/// Connects to the configured WebDriver, then to common local defaults
async fn connect_to_webdriver(config: &WebFetcherConfig) -> Result<Client, FetchError> {
    let caps = capabilities(config);
    if let Some(client) = try_connect(&config.webdriver_url, &caps).await {
        return Ok(client);
    }
    ::log::warn!(
        "Failed to connect to WebDriver at {}, trying fallbacks",
        config.webdriver_url
    );

    for url in FALLBACK_WEBDRIVER_URLS {
        if *url == config.webdriver_url {
            continue;
        }
        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Some(client) = try_connect(url, &caps).await {
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(FetchError::Connect {
        endpoint: config.webdriver_url.clone(),
    })
}

fn is_session_error(error: &CmdError) -> bool {
    is_session_message(&error.to_string())
}

/// WebDriver servers word a dead session differently
fn is_session_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("invalid session id")
        || message.contains("unable to find session")
        || message.contains("session deleted")
        || message.contains("no such window")
}

fn command_error(error: CmdError, url: &str) -> FetchError {
    if is_session_error(&error) {
        FetchError::SessionLost { url: url.to_string() }
    } else {
        FetchError::Command {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_capabilities() {
        let caps = capabilities(&WebFetcherConfig::default());
        assert_eq!(caps["goog:chromeOptions"]["args"][0], "--headless=new");

        let config = WebFetcherConfig {
            headless: false,
            ..WebFetcherConfig::default()
        };
        assert!(capabilities(&config).is_empty());
    }

    fn offline_fetcher(link_filter: Option<UrlFilter>) -> WebDriverFetcher {
        WebDriverFetcher {
            client: None,
            config: WebFetcherConfig::default(),
            link_filter,
        }
    }

    #[test]
    fn test_resolve_links() {
        let base = Url::parse("https://example.com/docs/intro").unwrap();
        let filter = UrlFilter::for_seed(&base, &WebFetcherConfig::default()).unwrap();
        let fetcher = offline_fetcher(Some(filter));

        let hrefs = [
            "setup",
            "/docs/setup#step-2",
            "https://other.com/x",
            "../img/logo.png",
            "https://example.com/faq",
            "ftp://example.com/file",
        ]
        .map(String::from);
        assert_eq!(
            fetcher.resolve_links(&base, &hrefs),
            vec!["https://example.com/docs/setup", "https://example.com/faq"]
        );
    }

    #[test]
    fn test_resolve_links_without_filter() {
        let base = Url::parse("https://example.com/").unwrap();
        let hrefs = ["https://other.com/x", "mailto:a@b.c"].map(String::from);
        assert_eq!(
            offline_fetcher(None).resolve_links(&base, &hrefs),
            vec!["https://other.com/x"]
        );
    }

    #[tokio::test]
    async fn test_fetch_without_session() {
        let mut fetcher = offline_fetcher(None);
        assert!(matches!(
            fetcher.fetch("https://example.com").await,
            Err(FetchError::SessionLost { .. })
        ));
        // Closing twice is harmless
        fetcher.close().await;
        fetcher.close().await;
    }

    #[test]
    fn test_session_messages_detected() {
        assert!(is_session_message("invalid session id: session timed out"));
        assert!(is_session_message("Unable to find session with ID: 1234"));
        assert!(!is_session_message("unknown error: net::ERR_NAME_NOT_RESOLVED"));
    }

    #[tokio::test]
    async fn test_connect_failure_is_reported() {
        let config = WebFetcherConfig {
            webdriver_url: "http://127.0.0.1:1".to_string(),
            ..WebFetcherConfig::default()
        };
        // Fallback ports may be served on a developer machine
        if let Err(e) = WebDriverFetcher::connect(&config).await {
            assert!(matches!(e, FetchError::Connect { .. }));
            assert!(e.to_string().contains("http://127.0.0.1:1"));
        }
    }
}
