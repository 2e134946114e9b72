//! Text reports built from fetched pages.
//!
//! A crawl report is a header followed by one block per page, in fetch
//! order. Two budgets bound it: each page's content is cut to the per-page
//! limit, and once the blocks together pass the total limit the report is
//! closed with a marker and the crawl is told to stop. All lengths count
//! characters, not bytes.

use crate::config::{CrawlConfig, CrawlStrategy};
use crate::error::FetchError;
use crate::results::{PageOutcome, PageResult};
use crate::utils::{char_len, truncate_chars};
use std::fmt::Write;
use std::ops::ControlFlow;

/// A partial block shorter than this is dropped instead of appended
pub const PARTIAL_BLOCK_FLOOR: usize = 100;

/// Appended to page content cut at the per-page limit
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated...]";

const UNKNOWN_ERROR: &str = "Unknown error";
const NO_TITLE: &str = "No title";

/// Streams `PageResult`s into one bounded report
#[derive(Debug)]
pub struct OutputAggregator {
    seed_url: String,
    max_depth: usize,
    strategy: CrawlStrategy,
    per_page_char_limit: usize,
    total_char_limit: usize,
    pages: usize,
    total_chars: usize,
    exhausted: bool,
    body: String,
}

impl OutputAggregator {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            seed_url: config.seed_url.clone(),
            max_depth: config.max_depth,
            strategy: config.strategy,
            per_page_char_limit: config.per_page_char_limit,
            total_char_limit: config.total_char_limit,
            pages: 0,
            total_chars: 0,
            exhausted: false,
            body: String::new(),
        }
    }

    /// Add the next page. Breaks once the total budget is used up; pages
    /// pushed after that are ignored.
    pub fn push(&mut self, page: &PageResult) -> ControlFlow<()> {
        if self.exhausted {
            return ControlFlow::Break(());
        }

        self.pages += 1;
        let block = self.render_block(self.pages, page);
        let block_chars = char_len(&block);
        let previous_total = self.total_chars;
        self.total_chars += block_chars;

        if self.total_chars <= self.total_char_limit {
            self.body.push_str(&block);
            return ControlFlow::Continue(());
        }

        // The previous total never exceeds the limit, so this can't underflow
        let remaining = self.total_char_limit - previous_total;
        if remaining > PARTIAL_BLOCK_FLOOR {
            self.body.push_str(truncate_chars(&block, remaining));
        }
        let _ = write!(
            self.body,
            "\n[Total content limit of {} characters reached. Stopping output.]\n",
            self.total_char_limit
        );
        ::log::info!(
            "Total content limit of {} characters reached at page {}",
            self.total_char_limit,
            self.pages
        );
        self.exhausted = true;
        ControlFlow::Break(())
    }

    fn render_block(&self, index: usize, page: &PageResult) -> String {
        match &page.outcome {
            PageOutcome::Failure { error_message } => format!(
                "\n---\nPage {}: {}\nStatus: Failed - {}\n",
                index,
                page.url,
                error_or_unknown(error_message)
            ),
            PageOutcome::Success { content } => {
                let content = if char_len(content) > self.per_page_char_limit {
                    format!(
                        "{}{}",
                        truncate_chars(content, self.per_page_char_limit),
                        TRUNCATION_MARKER
                    )
                } else {
                    content.clone()
                };
                format!(
                    "\n---\nPage {}: {}\nDepth: {}\nTitle: {}\nContent:\n{}\n",
                    index,
                    page.url,
                    page.depth,
                    page.title.as_deref().unwrap_or(NO_TITLE),
                    content
                )
            }
        }
    }

    /// Pages received so far
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Characters of all blocks received, counting the one that hit the limit in full
    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The finished report, header first
    pub fn finish(self) -> String {
        if self.pages == 0 {
            return format!("No pages crawled from {}", self.seed_url);
        }

        format!(
            "Crawled {} pages from {} (max depth: {}, strategy: {})\n{}",
            self.pages,
            self.seed_url,
            self.max_depth,
            self.strategy.name(),
            self.body
        )
    }
}

/// Formats the outcome of fetching a single page. No truncation applies.
pub fn format_single_page(url: &str, result: Result<PageResult, FetchError>) -> String {
    match result {
        Err(e) => format!("Error fetching webpage {}: {}", url, e),
        Ok(page) => match page.outcome {
            PageOutcome::Success { content } if !content.trim().is_empty() => {
                format!("Extracted content from {}:\n\n{}", url, content)
            }
            PageOutcome::Success { .. } => {
                format!("Successfully fetched {} but no content was extracted.", url)
            }
            PageOutcome::Failure { error_message } => format!(
                "Failed to fetch content from {}: {}",
                url,
                error_or_unknown(&error_message)
            ),
        },
    }
}

fn error_or_unknown(message: &str) -> &str {
    if message.trim().is_empty() {
        UNKNOWN_ERROR
    } else {
        message
    }
}
