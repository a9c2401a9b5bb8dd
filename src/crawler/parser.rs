//! HTML text extraction
//!
//! This module turns a fetched page into the plain text stored in the working table:
//! - Prefers an `<article>` or `<main>` region when it carries real content
//! - Skips scripts, styles and page chrome (nav, header, footer, forms)
//! - Keeps block boundaries as line breaks and collapses other whitespace

use scraper::{ElementRef, Html, Selector};

/// Elements whose subtree never contributes text
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "svg", "nav", "header", "footer", "aside", "form", "iframe",
    "template",
];

/// Elements that start a new line
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "th", "article",
    "section", "main", "blockquote", "pre", "figcaption", "dt", "dd", "table", "ul", "ol",
];

/// A focused region must have at least this many characters to be used alone
const MIN_REGION_CHARS: usize = 100;

/// Extracts readable text from an HTML document
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `max_chars` - Maximum characters returned
///
/// # Returns
///
/// The page text, one block per line. Empty when the page has no visible text.
///
/// # Example
///
/// ```
/// use signal_sift::crawler::extract_text;
///
/// let html = "<html><body><p>Hello</p><script>var x;</script><p>world</p></body></html>";
/// assert_eq!(extract_text(html, 1000), "Hello\nworld");
/// ```
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    for css in ["article", "main", "[role=\"main\"]"] {
        if let Ok(selector) = Selector::parse(css) {
            if let Some(region) = document.select(&selector).next() {
                let text = element_text(region, max_chars);
                if text.chars().count() >= MIN_REGION_CHARS {
                    return text;
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("body") {
        if let Some(body) = document.select(&selector).next() {
            return element_text(body, max_chars);
        }
    }

    element_text(document.root_element(), max_chars)
}

/// Extracts the page title from an HTML document
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn element_text(element: ElementRef<'_>, max_chars: usize) -> String {
    let mut buf = String::new();
    collect_text(element, &mut buf);
    collapse_whitespace(&buf, max_chars)
}

fn collect_text(element: ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIP_TAGS.contains(&name) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                buf.push('\n');
            }
            collect_text(child_el, buf);
            if block {
                buf.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            // Source line breaks are not visible; only block boundaries split lines
            buf.extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
        }
    }
}

/// Collapses whitespace within lines, drops blank lines and cuts to `max_chars`
fn collapse_whitespace(raw: &str, max_chars: usize) -> String {
    let joined = raw
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    match joined.char_indices().nth(max_chars) {
        Some((idx, _)) => joined[..idx].to_string(),
        None => joined,
    }
}
