use clap::{Parser, Subcommand};
use site_digest::filter::UrlNormalizer;
use site_digest::{ConfigError, CrawlConfig, CrawlStrategy, WebFetcherConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-digest")]
#[command(about = "Fetch web pages through a browser and print their content as text")]
#[command(version)]
pub struct Args {
    /// JSON file with browser and link-scope settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides the config file and WEBDRIVER_URL)
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fetch one page and print its main content
    Fetch {
        /// Page to fetch
        url: String,
    },

    /// Crawl a site from a seed URL and print a bounded report
    Crawl(CrawlArgs),
}

#[derive(clap::Args, Debug, PartialEq, Eq)]
pub struct CrawlArgs {
    /// Seed URL
    pub url: String,

    /// Maximum number of pages to fetch
    #[arg(long, default_value_t = 20)]
    pub max_pages: usize,

    /// Maximum link depth from the seed
    #[arg(long, default_value_t = 2)]
    pub max_depth: usize,

    /// Characters kept per page
    #[arg(long, default_value_t = 10000)]
    pub page_limit: usize,

    /// Characters in the whole report
    #[arg(long, default_value_t = 30000)]
    pub total_limit: usize,

    /// Traversal order, "bfs" or "dfs"
    #[arg(long, default_value = "bfs")]
    pub strategy: String,

    /// Treat URLs that differ only in their query string as one page
    #[arg(long)]
    pub ignore_query: bool,

    /// Treat "/docs" and "/docs/" as different pages
    #[arg(long)]
    pub strict_trailing_slash: bool,
}

impl Args {
    /// Resolve fetcher settings: config file, then environment, then flags
    pub fn fetcher_config(&self) -> Result<WebFetcherConfig, ConfigError> {
        let config = match &self.config {
            Some(path) => WebFetcherConfig::from_file(path)?,
            None => WebFetcherConfig::default(),
        };
        Ok(config
            .with_env()
            .with_webdriver_override(self.webdriver_url.clone()))
    }
}

impl CrawlArgs {
    /// Convert from CLI arguments to crawl settings
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::new(&self.url)
            .with_max_pages(self.max_pages)
            .with_max_depth(self.max_depth)
            .with_page_limit(self.page_limit)
            .with_total_limit(self.total_limit)
            .with_strategy(CrawlStrategy::from_name(&self.strategy))
            .with_normalizer(UrlNormalizer {
                ignore_query: self.ignore_query,
                trailing_slash_insensitive: !self.strict_trailing_slash,
            })
    }
}
