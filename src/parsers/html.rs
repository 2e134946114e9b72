use crate::parsers::ParseResult;
use crate::parsers::text::collapse_whitespace;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Candidates for the main content root, most specific first
static CONTENT_ROOTS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["main", "article", "[role=\"main\"]", "body"]
        .into_iter()
        .map(selector)
        .collect()
});
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static PRE: LazyLock<Selector> = LazyLock::new(|| selector("pre"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));

/// Page chrome and non-text elements
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "nav", "header", "footer", "aside", "form",
    "iframe", "button",
];

/// Elements that only group other blocks
const CONTAINER_TAGS: &[&str] = &[
    "div", "section", "article", "main", "ul", "ol", "dl", "table", "thead", "tbody", "tfoot",
    "figure", "details", "body", "center",
];

/// Parses a rendered page into title, main content and raw links
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);

    let title = extract_title(&doc);
    let content = extract_main_content(&doc);
    let links = extract_links(&doc);

    ::log::debug!("HTML parser found {} links", links.len());

    ParseResult::new(title, content, links)
}

/// Text of a plain document as the browser displays it
pub fn preformatted_text(source: &str) -> String {
    let doc = Html::parse_document(source);
    doc.select(&PRE)
        .next()
        .or_else(|| doc.select(&BODY).next())
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
}

/// `<title>`, falling back to the first `<h1>`
pub fn extract_title(doc: &Html) -> Option<String> {
    [&*TITLE, &*HEADING].into_iter().find_map(|sel| {
        doc.select(sel)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .find(|text| !text.is_empty())
    })
}

/// Link targets that could lead to another page, in document order
pub fn extract_links(doc: &Html) -> Vec<String> {
    doc.select(&LINK)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| {
            let lower = href.to_ascii_lowercase();
            !href.is_empty()
                && !href.starts_with('#')
                && !lower.starts_with("javascript:")
                && !lower.starts_with("mailto:")
                && !lower.starts_with("tel:")
        })
        .map(|href| href.to_string())
        .collect()
}

/// Main content as markdown-flavoured paragraphs separated by blank lines
pub fn extract_main_content(doc: &Html) -> String {
    let Some(root) = CONTENT_ROOTS
        .iter()
        .find_map(|sel| doc.select(sel).next())
    else {
        return String::new();
    };

    let mut blocks = Vec::new();
    let mut inline = String::new();
    collect_blocks(root, &mut blocks, &mut inline);
    flush_inline(&mut blocks, &mut inline);

    blocks.join("\n\n")
}

fn collect_blocks(element: ElementRef, blocks: &mut Vec<String>, inline: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => inline.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child.value().name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }

                if let Some(block) = render_block(child) {
                    flush_inline(blocks, inline);
                    if !block.is_empty() {
                        blocks.push(block);
                    }
                } else if CONTAINER_TAGS.contains(&name) {
                    flush_inline(blocks, inline);
                    collect_blocks(child, blocks, inline);
                    flush_inline(blocks, inline);
                } else if name == "br" {
                    inline.push(' ');
                } else {
                    collect_text(child, inline);
                }
            }
            _ => {}
        }
    }
}

/// Renders a leaf block element, or `None` if the element isn't one
fn render_block(element: ElementRef) -> Option<String> {
    let name = element.value().name();
    let block = match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let text = block_text(element);
            if text.is_empty() {
                text
            } else {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                format!("{} {}", "#".repeat(level), text)
            }
        }
        "li" | "dt" => prefixed("- ", block_text(element)),
        "blockquote" => prefixed("> ", block_text(element)),
        "pre" => element
            .text()
            .collect::<String>()
            .trim_matches('\n')
            .trim_end()
            .to_string(),
        "tr" => element
            .child_elements()
            .map(block_text)
            .filter(|cell| !cell.is_empty())
            .collect::<Vec<_>>()
            .join(" | "),
        "p" | "dd" | "figcaption" | "caption" | "address" => block_text(element),
        _ => return None,
    };
    Some(block)
}

fn prefixed(prefix: &str, text: String) -> String {
    if text.is_empty() {
        text
    } else {
        format!("{prefix}{text}")
    }
}

fn block_text(element: ElementRef) -> String {
    let mut text = String::new();
    collect_text(element, &mut text);
    collapse_whitespace(&text)
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child.value().name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let separated = name == "br"
                    || CONTAINER_TAGS.contains(&name)
                    || render_block_tag(name);
                if separated {
                    out.push(' ');
                }
                collect_text(child, out);
                if separated {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn render_block_tag(name: &str) -> bool {
    matches!(
        name,
        "h1" | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "p"
            | "li"
            | "dt"
            | "dd"
            | "tr"
            | "td"
            | "th"
            | "pre"
            | "blockquote"
    )
}

fn flush_inline(blocks: &mut Vec<String>, inline: &mut String) {
    let text = collapse_whitespace(inline);
    if !text.is_empty() {
        blocks.push(text);
    }
    inline.clear();
}
