pub mod html;
pub mod text;

use text::TextParserOptions;

#[cfg(test)]
mod tests;

/// Kind of document a URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// Rendered HTML page
    Html,
    /// Plain text shown by the browser (txt, yaml, markdown sources)
    Text,
    /// Images, stylesheets and other assets with no readable content
    Other,
}

impl ParserType {
    /// Determines the parser type based on the URL path
    pub fn from_url(url: &str) -> Self {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let parser_type = if [".txt", ".yaml", ".yml", ".md"]
            .iter()
            .any(|ext| path.ends_with(ext))
            || path.contains("/_sources/")
        {
            ParserType::Text
        } else if [".jpg", ".jpeg", ".png", ".gif", ".css", ".js", ".ico", ".svg"]
            .iter()
            .any(|ext| path.ends_with(ext))
        {
            ParserType::Other
        } else {
            ParserType::Html
        };

        ::log::trace!("Classified {} as {:?}", url, parser_type);
        parser_type
    }

    /// Returns if the parser should extract links
    pub fn should_extract_links(&self) -> bool {
        matches!(self, ParserType::Html)
    }
}

/// Result of parsing a page source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Page title, if one could be found
    pub title: Option<String>,
    /// Extracted main content
    pub content: String,
    /// Raw link targets, unresolved
    pub links: Vec<String>,
}

impl ParseResult {
    pub fn new(title: Option<String>, content: String, links: Vec<String>) -> Self {
        Self {
            title,
            content,
            links,
        }
    }

    /// Creates a new parse result with content only (no title or links)
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }
}

/// Main parser that delegates to specific format parsers
pub struct Parser;

impl Parser {
    /// Parse a page source based on the parser type
    pub fn parse(source: &str, parser_type: ParserType) -> ParseResult {
        match parser_type {
            ParserType::Html => html::parse(source),
            // Browsers wrap plain text documents in a <pre>
            ParserType::Text => text::parse(
                &html::preformatted_text(source),
                &TextParserOptions {
                    preserve_line_breaks: true,
                },
            ),
            ParserType::Other => ParseResult::default(),
        }
    }

    /// Determine parser type from URL and then parse the source
    pub fn parse_from_url(source: &str, url: &str) -> ParseResult {
        Self::parse(source, ParserType::from_url(url))
    }
}
