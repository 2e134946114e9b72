use crate::config::WebFetcherConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// File types that never carry readable page content
const ASSET_PATTERN: &str = r"(?i)\.(jpg|jpeg|png|gif|webp|css|js|ico|woff|woff2|ttf|eot|svg|pdf|zip|mp4|mp3)$";

/// Configuration for deciding which discovered links are worth following.
/// The default excludes assets and, lacking a domain, every URL.
#[derive(Debug, Clone)]
pub struct UrlFilterConfig {
    /// Whether links may leave the required domain
    pub allow_external: bool,

    /// Host that links must stay on (ignored when `allow_external` is set)
    pub required_domain: Option<String>,

    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    pub exclude_patterns: Vec<String>,
}

impl Default for UrlFilterConfig {
    fn default() -> Self {
        Self {
            allow_external: false,
            required_domain: None,
            include_patterns: Vec::new(),
            exclude_patterns: vec![ASSET_PATTERN.to_string()],
        }
    }
}

/// Link scope policy applied by the fetcher before links reach the frontier
#[derive(Debug)]
pub struct UrlFilter {
    config: UrlFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a new URL filter from configuration
    pub fn new(config: UrlFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Build the filter for a crawl rooted at `seed`: same host unless the
    /// fetcher config allows external links, plus the user's patterns.
    pub fn for_seed(seed: &Url, fetcher: &WebFetcherConfig) -> Result<Self, regex::Error> {
        let mut config = UrlFilterConfig {
            allow_external: fetcher.allow_external,
            required_domain: seed.host_str().map(|host| host.to_string()),
            include_patterns: fetcher.include_patterns.clone(),
            ..UrlFilterConfig::default()
        };
        config
            .exclude_patterns
            .extend(fetcher.exclude_patterns.iter().cloned());

        Self::new(config)
    }

    /// Determine if a link should be followed
    pub fn should_crawl(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        if !self.is_in_domain_scope(url) {
            return false;
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|regex| regex.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty()
            || self.include_regexes.iter().any(|regex| regex.is_match(url_str))
    }

    fn is_in_domain_scope(&self, url: &Url) -> bool {
        if self.config.allow_external {
            return true;
        }

        match (&self.config.required_domain, url.host_str()) {
            (Some(required), Some(host)) => host.eq_ignore_ascii_case(required),
            // Without a root host there is nothing to be internal to
            _ => false,
        }
    }
}

/// Rules for deciding when two URLs name the same page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlNormalizer {
    /// Treat URLs differing only in their query string as the same page
    #[serde(default)]
    pub ignore_query: bool,

    /// Treat `/docs` and `/docs/` as the same page
    #[serde(default = "default_trailing_slash_insensitive")]
    pub trailing_slash_insensitive: bool,
}

fn default_trailing_slash_insensitive() -> bool {
    true
}

impl Default for UrlNormalizer {
    fn default() -> Self {
        Self {
            ignore_query: false,
            trailing_slash_insensitive: true,
        }
    }
}

impl UrlNormalizer {
    /// Strip the parts of a URL that don't identify the page
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        if self.ignore_query {
            normalized.set_query(None);
        }
        if self.trailing_slash_insensitive {
            let trimmed = normalized.path().trim_end_matches('/').to_string();
            normalized.set_path(&trimmed);
        }
        normalized
    }

    /// Dedup key for a raw URL string. Unparseable input is compared as
    /// trimmed text with the fragment removed.
    pub fn key(&self, raw: &str) -> String {
        match Url::parse(raw.trim()) {
            Ok(url) => self.normalize_url(&url).into(),
            Err(_) => {
                let without_fragment = raw.trim().split('#').next().unwrap_or_default();
                if self.trailing_slash_insensitive {
                    without_fragment.trim_end_matches('/').to_string()
                } else {
                    without_fragment.to_string()
                }
            }
        }
    }
}
