use crate::error::ConfigError;
use crate::filter::UrlNormalizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Order in which the frontier hands out URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CrawlStrategy {
    /// Visit every page at depth d before any page at depth d + 1
    #[default]
    Bfs,
    /// Follow the most recently discovered link first
    Dfs,
}

impl CrawlStrategy {
    /// Parse a strategy name. Only "dfs" (any case) selects depth-first.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("dfs") {
            CrawlStrategy::Dfs
        } else {
            CrawlStrategy::Bfs
        }
    }

    /// Upper-case name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            CrawlStrategy::Bfs => "BFS",
            CrawlStrategy::Dfs => "DFS",
        }
    }
}

impl From<String> for CrawlStrategy {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<CrawlStrategy> for String {
    fn from(value: CrawlStrategy) -> Self {
        value.name().to_lowercase()
    }
}

impl fmt::Display for CrawlStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters of one deep crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// URL to start crawling from
    pub seed_url: String,

    /// Maximum number of pages to fetch (at least 1)
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link depth to follow from the seed
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum characters kept from a single page's content
    #[serde(default = "default_page_limit")]
    pub per_page_char_limit: usize,

    /// Maximum characters across all page blocks of the report
    #[serde(default = "default_total_limit")]
    pub total_char_limit: usize,

    /// Traversal order
    #[serde(default)]
    pub strategy: CrawlStrategy,

    /// When two discovered URLs count as the same page
    #[serde(default)]
    pub normalizer: UrlNormalizer,
}

impl CrawlConfig {
    /// Create a new configuration with default limits
    pub fn new(seed_url: &str) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            per_page_char_limit: default_page_limit(),
            total_char_limit: default_total_limit(),
            strategy: CrawlStrategy::default(),
            normalizer: UrlNormalizer::default(),
        }
    }

    /// Set the page count limit; values below 1 are raised to 1
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_page_limit(mut self, chars: usize) -> Self {
        self.per_page_char_limit = chars;
        self
    }

    pub fn with_total_limit(mut self, chars: usize) -> Self {
        self.total_char_limit = chars;
        self
    }

    pub fn with_strategy(mut self, strategy: CrawlStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_normalizer(mut self, normalizer: UrlNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Page count limit, never below 1 even if deserialized as 0
    pub fn page_cap(&self) -> usize {
        self.max_pages.max(1)
    }
}

/// Configuration of the WebDriver-backed fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebFetcherConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Ask the browser to run without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Base time allowed for loading and extracting one page
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Time allowed for a whole fetch or crawl invocation
    #[serde(default = "default_total_timeout_secs")]
    pub total_timeout_secs: u64,

    /// CSS selector to wait for after navigation
    #[serde(default)]
    pub wait_for_selector: Option<String>,

    /// Reconnect and fetch the page again once if the session is lost
    #[serde(default)]
    pub retry_lost_session: bool,

    /// Whether discovered links may leave the seed's domain
    #[serde(default)]
    pub allow_external: bool,

    /// Regex patterns for links to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for links to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for WebFetcherConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            page_timeout_secs: default_page_timeout_secs(),
            total_timeout_secs: default_total_timeout_secs(),
            wait_for_selector: None,
            retry_lost_session: false,
            allow_external: false,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl WebFetcherConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the `WEBDRIVER_URL` environment variable, if set
    pub fn with_env(self) -> Self {
        self.with_webdriver_override(std::env::var("WEBDRIVER_URL").ok())
    }

    /// Replace the WebDriver URL unless the override is missing or empty
    pub fn with_webdriver_override(mut self, webdriver_url: Option<String>) -> Self {
        if let Some(url) = webdriver_url {
            if !url.trim().is_empty() {
                self.webdriver_url = url;
            }
        }
        self
    }
}

fn default_max_pages() -> usize {
    20
}

fn default_max_depth() -> usize {
    2
}

fn default_page_limit() -> usize {
    10_000
}

fn default_total_limit() -> usize {
    30_000
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

/// Default per-page timeout, in seconds
fn default_page_timeout_secs() -> u64 {
    45
}

/// Default invocation timeout (20 minutes)
fn default_total_timeout_secs() -> u64 {
    1200
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_strategy_names() {
        assert_eq!(CrawlStrategy::from_name("dfs"), CrawlStrategy::Dfs);
        assert_eq!(CrawlStrategy::from_name("DFS"), CrawlStrategy::Dfs);
        assert_eq!(CrawlStrategy::from_name("bfs"), CrawlStrategy::Bfs);
        // Anything unrecognised falls back to breadth-first
        assert_eq!(CrawlStrategy::from_name("best-first"), CrawlStrategy::Bfs);
        assert_eq!(CrawlStrategy::from_name(""), CrawlStrategy::Bfs);
        assert_eq!(CrawlStrategy::Dfs.to_string(), "DFS");
    }

    #[test]
    fn test_crawl_config_defaults() {
        let config = CrawlConfig::new("https://example.com");
        assert_eq!(config.max_pages, 20);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.per_page_char_limit, 10_000);
        assert_eq!(config.total_char_limit, 30_000);
        assert_eq!(config.strategy, CrawlStrategy::Bfs);
    }

    #[test]
    fn test_max_pages_clamped() {
        let config = CrawlConfig::new("https://example.com").with_max_pages(0);
        assert_eq!(config.max_pages, 1);

        let json = r#"{"seed_url": "https://example.com", "max_pages": 0, "strategy": "DfS"}"#;
        let config: CrawlConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.page_cap(), 1);
        assert_eq!(config.strategy, CrawlStrategy::Dfs);
        assert_eq!(config.normalizer, UrlNormalizer::default());
    }

    #[test]
    fn test_normalizer_from_json() {
        let json = r#"{"seed_url": "https://example.com", "normalizer": {"ignore_query": true}}"#;
        let config: CrawlConfig = serde_json::from_str(json).unwrap();
        assert!(config.normalizer.ignore_query);
        // Unset knobs keep their defaults
        assert!(config.normalizer.trailing_slash_insensitive);
    }

    #[test]
    fn test_fetcher_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"webdriver_url": "http://localhost:9515", "exclude_patterns": ["/login"]}}"#
        )
        .unwrap();

        let config = WebFetcherConfig::from_file(file.path()).unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(config.exclude_patterns, vec!["/login".to_string()]);
        assert!(config.headless);
        assert_eq!(config.page_timeout_secs, 45);
    }

    #[test]
    fn test_fetcher_config_rejects_bad_json() {
        assert!(matches!(
            WebFetcherConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_webdriver_override() {
        let config = WebFetcherConfig::default().with_webdriver_override(Some(String::new()));
        assert_eq!(config.webdriver_url, "http://localhost:4444");

        let config = config.with_webdriver_override(Some("http://grid:4444".to_string()));
        assert_eq!(config.webdriver_url, "http://grid:4444");
    }
}
