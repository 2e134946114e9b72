use serde::{Deserialize, Serialize};

/// Whether a fetch produced content or an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Page loaded; content may be empty
    Success { content: String },
    /// Page could not be loaded
    Failure { error_message: String },
}

/// Normalized outcome of one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// URL of the page after redirects
    pub url: String,

    /// Title of the page (if available)
    pub title: Option<String>,

    /// Distance from the seed page
    pub depth: usize,

    /// Content or error
    pub outcome: PageOutcome,

    /// Absolute links found on the page, in discovery order
    pub discovered_links: Vec<String>,
}

impl PageResult {
    /// Create a successful page result at depth 0
    pub fn success(
        url: impl Into<String>,
        title: Option<String>,
        content: impl Into<String>,
        discovered_links: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title,
            depth: 0,
            outcome: PageOutcome::Success {
                content: content.into(),
            },
            discovered_links,
        }
    }

    /// Create a failed page result at depth 0
    pub fn failure(url: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            depth: 0,
            outcome: PageOutcome::Failure {
                error_message: error_message.into(),
            },
            discovered_links: Vec::new(),
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PageOutcome::Success { .. })
    }

    /// Extracted content, only for successful pages
    pub fn content(&self) -> Option<&str> {
        match &self.outcome {
            PageOutcome::Success { content } => Some(content),
            PageOutcome::Failure { .. } => None,
        }
    }

    /// Error description, only for failed pages
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            PageOutcome::Success { .. } => None,
            PageOutcome::Failure { error_message } => Some(error_message),
        }
    }
}
