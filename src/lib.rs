//! Fetch web pages through a browser and fold their content into
//! size-bounded text reports, optionally crawling internal links from a
//! seed URL.

pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod parsers;
pub mod report;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{CrawlConfig, CrawlStrategy, WebFetcherConfig};
pub use crawlers::{CrawlScheduler, Fetcher, WebDriverFetcher};
pub use error::{ConfigError, CrawlError, FetchError};
pub use report::OutputAggregator;
pub use results::{PageOutcome, PageResult};

use filter::UrlFilter;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// Fetch one page in a fresh browser session and return its content, or a
/// message describing why it couldn't be fetched.
pub async fn fetch_webpage(url: &str, fetcher_config: &WebFetcherConfig) -> String {
    let mut fetcher = match WebDriverFetcher::connect(fetcher_config).await {
        Ok(fetcher) => fetcher,
        Err(e) => {
            ::log::error!("Failed to start browser session: {}", e);
            return format!("Error fetching webpage {}: {}", url, e);
        }
    };

    let limit = Duration::from_secs(fetcher_config.total_timeout_secs);
    fetch_bounded(&mut fetcher, url, limit).await
}

/// Crawl a site in a fresh browser session and return the report, or a
/// message describing why the crawl couldn't run.
pub async fn crawl_site(config: &CrawlConfig, fetcher_config: &WebFetcherConfig) -> String {
    match try_crawl_site(config, fetcher_config).await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Crawl of {} failed: {}", config.seed_url, e);
            format!("Error crawling site {}: {}", config.seed_url, e)
        }
    }
}

async fn try_crawl_site(
    config: &CrawlConfig,
    fetcher_config: &WebFetcherConfig,
) -> Result<String, CrawlError> {
    let seed = Url::parse(&config.seed_url)?;
    let filter = UrlFilter::for_seed(&seed, fetcher_config).map_err(ConfigError::from)?;
    let mut fetcher = WebDriverFetcher::connect(fetcher_config)
        .await?
        .with_link_filter(filter);

    let limit = Duration::from_secs(fetcher_config.total_timeout_secs);
    crawl_bounded(&mut fetcher, config, limit).await
}

/// Fetch and format a single page with any fetcher
pub async fn fetch_with<F>(fetcher: &mut F, url: &str) -> String
where
    F: Fetcher + ?Sized,
{
    ::log::info!("Fetching {}", url);
    report::format_single_page(url, fetcher.fetch(url).await)
}

/// Like [`fetch_with`], giving up after `limit` and closing the fetcher
/// either way
pub async fn fetch_bounded<F>(fetcher: &mut F, url: &str, limit: Duration) -> String
where
    F: Fetcher + ?Sized,
{
    let result = timeout(limit, fetch_with(fetcher, url)).await;
    fetcher.close().await;
    result.unwrap_or_else(|_| {
        format!(
            "Error fetching webpage {}: {}",
            url,
            CrawlError::Timeout(limit)
        )
    })
}

/// Run a whole crawl with any fetcher and return the report
pub async fn crawl_with<F>(fetcher: &mut F, config: &CrawlConfig) -> String
where
    F: Fetcher + ?Sized,
{
    ::log::info!(
        "Starting {} crawl of {} (max pages: {}, max depth: {})",
        config.strategy,
        config.seed_url,
        config.page_cap(),
        config.max_depth
    );

    let mut scheduler = CrawlScheduler::new(config);
    let mut aggregator = OutputAggregator::new(config);
    let outcome = scheduler.run(fetcher, &mut aggregator).await;

    let failed = outcome.pages.iter().filter(|page| !page.is_success()).count();
    ::log::info!(
        "Crawled {} pages ({} failed), report uses {} characters",
        outcome.pages.len(),
        failed,
        aggregator.total_chars()
    );

    aggregator.finish()
}

/// Like [`crawl_with`], giving up after `limit` and closing the fetcher
/// either way. An interrupted crawl yields no report.
pub async fn crawl_bounded<F>(
    fetcher: &mut F,
    config: &CrawlConfig,
    limit: Duration,
) -> Result<String, CrawlError>
where
    F: Fetcher + ?Sized,
{
    let report = timeout(limit, crawl_with(fetcher, config)).await;
    fetcher.close().await;
    report.map_err(|_| CrawlError::Timeout(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawlers::tests::ScriptedFetcher;

    const SEED: &str = "https://docs.test/";

    #[tokio::test]
    async fn test_fetch_with_formats_page() {
        let mut fetcher = ScriptedFetcher::new().page(SEED, "Welcome to the docs", &[]);
        assert_eq!(
            fetch_with(&mut fetcher, SEED).await,
            "Extracted content from https://docs.test/:\n\nWelcome to the docs"
        );
    }

    #[tokio::test]
    async fn test_fetch_with_reports_fetcher_error() {
        let mut fetcher = ScriptedFetcher::new().broken(SEED, "browser went away");
        assert_eq!(
            fetch_with(&mut fetcher, SEED).await,
            "Error fetching webpage https://docs.test/: browser went away"
        );
    }

    #[tokio::test]
    async fn test_fetch_bounded_closes_fetcher() {
        let mut fetcher = ScriptedFetcher::new().page(SEED, "", &[]);
        let output = fetch_bounded(&mut fetcher, SEED, Duration::from_secs(5)).await;
        assert_eq!(
            output,
            "Successfully fetched https://docs.test/ but no content was extracted."
        );
        assert!(fetcher.closed);
    }

    #[tokio::test]
    async fn test_fetch_bounded_timeout() {
        let mut fetcher = ScriptedFetcher::new()
            .page(SEED, "late", &[])
            .slow(Duration::from_millis(500));
        let output = fetch_bounded(&mut fetcher, SEED, Duration::from_millis(20)).await;
        assert!(output.starts_with("Error fetching webpage https://docs.test/: gave up after"));
        assert!(fetcher.closed);
    }

    #[tokio::test]
    async fn test_crawl_with_uses_boxed_fetcher() {
        let mut fetcher: Box<dyn Fetcher> = Box::new(
            ScriptedFetcher::new()
                .page(SEED, "home", &["https://docs.test/guide"])
                .page("https://docs.test/guide", "guide", &[]),
        );
        let report = crawl_with(&mut fetcher, &CrawlConfig::new(SEED)).await;
        assert!(report.starts_with(
            "Crawled 2 pages from https://docs.test/ (max depth: 2, strategy: BFS)\n"
        ));
        assert!(report.contains("Page 2: https://docs.test/guide\nDepth: 1\n"));
    }

    #[tokio::test]
    async fn test_crawl_bounded_closes_fetcher() {
        let mut fetcher = ScriptedFetcher::new().page(SEED, "home", &[]);
        let report = crawl_bounded(&mut fetcher, &CrawlConfig::new(SEED), Duration::from_secs(5))
            .await
            .unwrap();
        assert!(report.starts_with("Crawled 1 pages"));
        assert!(fetcher.closed);
    }

    #[tokio::test]
    async fn test_crawl_bounded_timeout() {
        let mut fetcher = ScriptedFetcher::new()
            .page(SEED, "home", &[])
            .slow(Duration::from_millis(500));
        let result =
            crawl_bounded(&mut fetcher, &CrawlConfig::new(SEED), Duration::from_millis(20)).await;
        assert!(matches!(result, Err(CrawlError::Timeout(_))));
        assert!(fetcher.closed);
    }

    #[tokio::test]
    async fn test_crawl_site_rejects_bad_seed() {
        let output = crawl_site(&CrawlConfig::new("not a url"), &WebFetcherConfig::default()).await;
        assert!(output.starts_with("Error crawling site not a url: invalid URL:"));
    }

    #[tokio::test]
    async fn test_crawl_site_rejects_bad_pattern() {
        let fetcher_config = WebFetcherConfig {
            include_patterns: vec!["(".to_string()],
            ..WebFetcherConfig::default()
        };
        let output = crawl_site(&CrawlConfig::new(SEED), &fetcher_config).await;
        assert!(output.starts_with("Error crawling site https://docs.test/: invalid URL pattern"));
    }
}
