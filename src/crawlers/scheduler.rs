use crate::config::CrawlConfig;
use crate::crawlers::fetcher::Fetcher;
use crate::crawlers::frontier::Frontier;
use crate::report::OutputAggregator;
use crate::results::PageResult;
use std::ops::ControlFlow;

/// Why a crawl ended. All of these are normal completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every reachable page within the depth limit was fetched
    FrontierExhausted,
    /// `max_pages` pages were fetched
    PageLimit,
    /// The report ran out of character budget
    BudgetExhausted,
}

/// Pages fetched by a crawl, in fetch order
#[derive(Debug)]
pub struct CrawlOutcome {
    pub pages: Vec<PageResult>,
    pub stop: StopReason,
}

/// Drives one crawl: owns the frontier and the fetched-page count.
///
/// Fetches run one at a time since which links get queued depends on the
/// page just fetched. Dropping the future returned by [`run`] cancels the
/// crawl at the pending fetch.
///
/// [`run`]: CrawlScheduler::run
#[derive(Debug)]
pub struct CrawlScheduler {
    frontier: Frontier,
    max_pages: usize,
    max_depth: usize,
    fetched: usize,
}

impl CrawlScheduler {
    /// Create a scheduler with the seed queued at depth 0
    pub fn new(config: &CrawlConfig) -> Self {
        let mut frontier = Frontier::new(config.strategy, config.max_depth, config.normalizer);
        frontier.enqueue(&config.seed_url, 0);

        Self {
            frontier,
            max_pages: config.page_cap(),
            max_depth: config.max_depth,
            fetched: 0,
        }
    }

    /// Crawl until the frontier empties, the page limit is hit or the
    /// aggregator runs out of budget.
    pub async fn run<F>(&mut self, fetcher: &mut F, aggregator: &mut OutputAggregator) -> CrawlOutcome
    where
        F: Fetcher + ?Sized,
    {
        let mut pages = Vec::new();

        let stop = loop {
            if self.fetched >= self.max_pages {
                break StopReason::PageLimit;
            }
            let Some(entry) = self.frontier.dequeue() else {
                break StopReason::FrontierExhausted;
            };

            ::log::debug!("Fetching {} (depth {})", entry.url, entry.depth);
            let mut page = match fetcher.fetch(&entry.url).await {
                Ok(page) => page,
                Err(e) => {
                    ::log::warn!("Fetch of {} failed: {}", entry.url, e);
                    PageResult::failure(entry.url.as_str(), e.to_string())
                }
            }
            .with_depth(entry.depth);
            self.fetched += 1;

            if page.url != entry.url {
                self.frontier.mark_visited(&page.url);
            }

            if page.is_success() && entry.depth < self.max_depth {
                let queued = self
                    .frontier
                    .enqueue_links(&page.discovered_links, entry.depth + 1);
                ::log::debug!(
                    "Queued {} of {} links from {}",
                    queued,
                    page.discovered_links.len(),
                    page.url
                );
            } else {
                page.discovered_links.clear();
            }

            let flow = aggregator.push(&page);
            pages.push(page);
            if let ControlFlow::Break(()) = flow {
                break StopReason::BudgetExhausted;
            }
        };

        ::log::info!(
            "Crawl finished after {} pages ({:?}), {} URLs still queued",
            self.fetched,
            stop,
            self.frontier.len()
        );

        CrawlOutcome { pages, stop }
    }

    /// Pages fetched so far
    pub fn fetched(&self) -> usize {
        self.fetched
    }
}
