use crate::parsers::ParseResult;

/// How line structure inside a paragraph is treated
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParserOptions {
    /// Keep single newlines within paragraphs instead of joining lines
    pub preserve_line_breaks: bool,
}

/// Parses plain text, keeping paragraphs separated by one empty line
pub fn parse(text: &str, options: &TextParserOptions) -> ParseResult {
    ParseResult::content_only(normalize(text, options))
}

/// Normalizes text into paragraphs separated by exactly one empty line.
///
/// Lines are trimmed and runs of whitespace inside a line collapse to a
/// single space. Unless `preserve_line_breaks` is set, the lines of a
/// paragraph are joined with spaces.
pub fn normalize(text: &str, options: &TextParserOptions) -> String {
    split_into_paragraphs(text)
        .iter()
        .map(|para| process_paragraph(para, options))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Splits text into paragraphs based on empty lines
pub fn split_into_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current_paragraph: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if !current_paragraph.is_empty() {
                paragraphs.push(std::mem::take(&mut current_paragraph));
            }
        } else {
            current_paragraph.push(trimmed);
        }
    }

    if !current_paragraph.is_empty() {
        paragraphs.push(current_paragraph);
    }

    paragraphs
}

/// Processes a single paragraph according to options
pub fn process_paragraph(paragraph: &[&str], options: &TextParserOptions) -> String {
    let lines = paragraph.iter().map(|line| collapse_whitespace(line));
    if options.preserve_line_breaks {
        lines.collect::<Vec<_>>().join("\n")
    } else {
        lines.collect::<Vec<_>>().join(" ")
    }
}

/// Collapses every run of whitespace into one space and trims the ends
pub fn collapse_whitespace(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}
