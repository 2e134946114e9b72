use crate::parsers::text::{self, TextParserOptions};

#[test]
fn test_empty_text() {
    let result = text::parse("", &TextParserOptions::default());
    assert_eq!(result.content, "");
    assert!(result.links.is_empty());
    assert!(result.title.is_none());
}

#[test]
fn test_whitespace_only() {
    let result = text::parse("   \n   \t   \r\n   ", &TextParserOptions::default());
    assert_eq!(result.content, "");
}

#[test]
fn test_lines_join_within_paragraph() {
    let result = text::parse("  Line 1  \n  Line 2  \t\r\n  Line 3  ", &TextParserOptions::default());
    assert_eq!(result.content, "Line 1 Line 2 Line 3");
}

#[test]
fn test_paragraphs_separated_by_one_blank_line() {
    let input = "Paragraph 1.\n\n\n\nParagraph    2.\n\n\nParagraph 3.";
    let result = text::parse(input, &TextParserOptions::default());
    assert_eq!(result.content, "Paragraph 1.\n\nParagraph 2.\n\nParagraph 3.");
}

#[test]
fn test_urls_in_text_are_not_links() {
    let input = "Check out https://example.com for more.\nOr visit http://test.org/page.html";
    let result = text::parse(input, &TextParserOptions::default());
    assert_eq!(
        result.content,
        "Check out https://example.com for more. Or visit http://test.org/page.html"
    );
    assert!(result.links.is_empty());
}

#[test]
fn test_preserve_line_breaks() {
    let options = TextParserOptions {
        preserve_line_breaks: true,
    };
    let input = "key:   value\nother: thing\n\n\nnext";
    assert_eq!(
        text::normalize(input, &options),
        "key: value\nother: thing\n\nnext"
    );
}

#[test]
fn test_split_into_paragraphs() {
    assert!(text::split_into_paragraphs("").is_empty());

    let result = text::split_into_paragraphs("Line 1a\nLine 1b\n\n  \nLine 2a");
    assert_eq!(result, vec![vec!["Line 1a", "Line 1b"], vec!["Line 2a"]]);
}
