//! HTML parser for extracting links, title and text
//!
//! This module turns a fetched document into a [`Document`]:
//! - Page title
//! - Flattened, whitespace-normalized body text
//! - Links to follow (absolute, normalized, de-duplicated)
//!
//! Extraction never fails. Broken markup yields whatever html5ever recovers,
//! possibly an empty title or no links.

use crate::url::Address;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;

/// Elements whose text is not part of the readable body
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that separate words when flattened
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// The page title (from the first `<title>` tag), empty if absent
    pub title: String,

    /// Visible text of `<body>` with runs of whitespace collapsed
    pub body_text: String,

    /// Outbound links, in document order, without duplicates
    pub links: Vec<Address>,
}

/// Turns a raw document body into a [`Document`]
///
/// `base` is the address the body was fetched from; relative links resolve
/// against it.
pub trait Extractor: Send + Sync {
    fn extract(&self, body: &str, base: &Address) -> Document;
}

/// [`Extractor`] for HTML documents, built on scraper
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, body: &str, base: &Address) -> Document {
        parse_html(body, base)
    }
}

/// Parses HTML content and extracts title, text and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` and `<area href="...">`
///
/// **Exclude:**
/// - Empty or missing `href`
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that does not resolve to an HTTP(S) address
///
/// # Example
///
/// ```
/// use ripple_seek::crawler::parse_html;
/// use ripple_seek::url::Address;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base = Address::parse("https://example.com/").unwrap();
/// let document = parse_html(html, &base);
/// assert_eq!(document.title, "Test");
/// assert_eq!(document.body_text, "Link");
/// assert_eq!(document.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base: &Address) -> Document {
    let document = Html::parse_document(html);

    Document {
        title: extract_title(&document),
        body_text: extract_body_text(&document),
        links: extract_links(&document, base),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .unwrap_or_default()
}

/// Extracts the visible text of `<body>`
fn extract_body_text(document: &Html) -> String {
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };

    let mut raw = String::new();
    if let Some(body) = document.select(&body_selector).next() {
        collect_text(body, &mut raw);
    }

    collapse_whitespace(&raw)
}

/// Appends the text below `element`, skipping non-text elements
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if NON_TEXT_ELEMENTS.contains(&el.name()) => {}
            Node::Element(el) => {
                let is_block = BLOCK_ELEMENTS.contains(&el.name());
                if is_block {
                    out.push(' ');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if is_block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base: &Address) -> Vec<Address> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(link_selector) = Selector::parse("a[href], area[href]") else {
        return links;
    };

    for element in document.select(&link_selector) {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            if let Some(address) = resolve_link(href, base) {
                if seen.insert(address.clone()) {
                    links.push(address);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute address
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base: &Address) -> Option<Address> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    base.join(href).ok()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
