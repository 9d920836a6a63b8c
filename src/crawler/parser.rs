//! HTML parser
//!
//! [`PageParser`] is the seam between the engine and content parsing;
//! [`HtmlParser`] is the scraper-backed implementation. It produces the
//! page's visible text (for keyword matching and sentiment scoring) and its
//! outbound links, already resolved to absolute URLs.

use crate::ParseError;
use scraper::{Html, Selector};
use url::Url;

/// Extracted content of a fetched page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Visible text of the page, script/style content excluded
    pub text: String,

    /// Outbound links, resolved against the page URL
    pub links: Vec<Url>,
}

/// Extracts text and outbound links from raw page content
pub trait PageParser: Send + Sync {
    fn parse(&self, raw: &[u8], base: &Url) -> Result<ParsedPage, ParseError>;
}

/// scraper-backed HTML parser
#[derive(Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for HtmlParser {
    fn parse(&self, raw: &[u8], base: &Url) -> Result<ParsedPage, ParseError> {
        if raw.is_empty() {
            return Err(ParseError::EmptyDocument);
        }
        if raw.contains(&0) {
            return Err(ParseError::BinaryContent);
        }

        let html = String::from_utf8_lossy(raw);
        let document = Html::parse_document(&html);

        Ok(ParsedPage {
            text: extract_text(&document),
            links: extract_links(&document, base),
        })
    }
}

/// Collects the document's visible text
///
/// Text inside `script`, `style`, and `noscript` elements is markup
/// plumbing, not page content, and would poison keyword matching.
fn extract_text(document: &Html) -> String {
    let mut out = String::new();

    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|e| matches!(e.name(), "script" | "style" | "noscript"))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(trimmed);
        }
    }

    out
}

/// Extracts all followable links from the document
fn extract_links(document: &Html, base: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            // Download links point at files, not pages
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_link(href, base) {
                    links.push(url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None for links that can never be crawled:
/// - `javascript:`, `mailto:`, `tel:` schemes and data URIs
/// - fragment-only links (same-page anchors)
/// - hrefs that fail to resolve, or resolve to a non-HTTP(S) scheme
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        _ => None,
    }
}
