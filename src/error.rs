use thiserror::Error;

/// Failure of the fetch primitive itself, as opposed to a page that loaded
/// with an error. The scheduler turns these into failed pages.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to connect to any WebDriver server (tried {endpoint})")]
    Connect { endpoint: String },

    #[error("WebDriver session lost while fetching {url}")]
    SessionLost { url: String },

    #[error("timed out after {secs}s fetching {url}")]
    Timeout { url: String, secs: u64 },

    #[error("WebDriver command failed for {url}: {source}")]
    Command {
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("{0}")]
    Other(String),
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid URL pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors that prevent an invocation from starting or finishing
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("gave up after {0:?}")]
    Timeout(std::time::Duration),
}
