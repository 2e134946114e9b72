//! In-memory site used to drive the crawl core in tests.


use crate::crawlers::Fetcher;
use crate::error::FetchError;
use crate::results::PageResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// What the scripted site answers for one URL
#[derive(Debug, Clone)]
pub(crate) enum Response {
    Page {
        title: Option<String>,
        content: String,
        links: Vec<String>,
        redirect_to: Option<String>,
    },
    Failed(String),
    Broken(String),
}

/// A fetcher that replays a fixed site and records what was fetched
#[derive(Debug, Default)]
pub(crate) struct ScriptedFetcher {
    responses: HashMap<String, Response>,
    delay: Option<Duration>,
    pub(crate) fetched: Vec<String>,
    pub(crate) closed: bool,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every fetch takes this long
    pub(crate) fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// A page with the given content linking to `links`
    pub(crate) fn page(mut self, url: &str, content: &str, links: &[&str]) -> Self {
        self.responses.insert(
            url.to_string(),
            Response::Page {
                title: Some(format!("Title of {url}")),
                content: content.to_string(),
                links: links.iter().map(|link| link.to_string()).collect(),
                redirect_to: None,
            },
        );
        self
    }

    /// A page served from a different URL than requested
    pub(crate) fn redirect(mut self, url: &str, target: &str, links: &[&str]) -> Self {
        self.responses.insert(
            url.to_string(),
            Response::Page {
                title: None,
                content: format!("landed on {target}"),
                links: links.iter().map(|link| link.to_string()).collect(),
                redirect_to: Some(target.to_string()),
            },
        );
        self
    }

    /// A page that loads with an error
    pub(crate) fn failed(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), Response::Failed(message.to_string()));
        self
    }

    /// A URL on which the fetcher itself breaks
    pub(crate) fn broken(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), Response::Broken(message.to_string()));
        self
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&mut self, url: &str) -> Result<PageResult, FetchError> {
        self.fetched.push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.responses.get(url).cloned() {
            Some(Response::Page {
                title,
                content,
                links,
                redirect_to,
            }) => Ok(PageResult::success(
                redirect_to.unwrap_or_else(|| url.to_string()),
                title,
                content,
                links,
            )),
            Some(Response::Failed(message)) => Ok(PageResult::failure(url, message)),
            Some(Response::Broken(message)) => Err(FetchError::Other(message)),
            None => Ok(PageResult::failure(url, "404 Not Found")),
        }
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}
