//! Deep crawl orchestration and the page-fetch capability it drives.

mod fetcher;
mod frontier;
mod scheduler;
pub mod web;

#[cfg(test)]
pub(crate) mod tests;

pub use fetcher::Fetcher;
pub use frontier::{Frontier, FrontierEntry};
pub use scheduler::{CrawlOutcome, CrawlScheduler, StopReason};
pub use web::WebDriverFetcher;
