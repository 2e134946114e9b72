use crate::error::FetchError;
use crate::results::PageResult;
use async_trait::async_trait;

/// The page-fetch capability consumed by the crawl core.
///
/// `fetch` returns `Ok` for every page the backend could reason about,
/// including pages that failed to load (`PageResult::failure`). `Err` is
/// reserved for failures of the backend itself, such as a lost browser
/// session. Discovered links must already be restricted to the links the
/// backend is willing to have crawled.
#[async_trait]
pub trait Fetcher: Send {
    /// Fetch one URL
    async fn fetch(&mut self, url: &str) -> Result<PageResult, FetchError>;

    /// Release any resources held by the fetcher
    async fn close(&mut self) {}
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    async fn fetch(&mut self, url: &str) -> Result<PageResult, FetchError> {
        (**self).fetch(url).await
    }

    async fn close(&mut self) {
        (**self).close().await
    }
}
