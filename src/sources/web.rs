//! Web extractor: one citation record per page.

use regex::bytes::Regex;
use reqwest::header::CONTENT_TYPE;
use scraper::{node::Element, ElementRef, Html, Node, Selector};
use std::sync::{Arc, LazyLock};
use url::Url;

use super::CitationError;
use crate::models::CitationRecord;
use crate::utils::{normalize_whitespace, DiagnosticSink, HttpClient};

/// Elements whose text is never rendered
const NON_VISIBLE_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// How far into a body to look for a `<meta>` charset declaration
const META_PRESCAN_BYTES: usize = 1024;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta\s[^>]*charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#)
        .expect("meta charset pattern is valid")
});

/// Charset declared by a `<meta charset>` or `<meta http-equiv>` tag near
/// the start of an HTML body
pub fn sniff_meta_charset(body: &[u8]) -> Option<String> {
    let head = &body[..body.len().min(META_PRESCAN_BYTES)];
    META_CHARSET
        .captures(head)
        .and_then(|caps| caps.get(1))
        .map(|label| String::from_utf8_lossy(label.as_bytes()).to_ascii_lowercase())
}

/// Title and visible text of a parsed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub title: String,
    pub text: String,
}

/// Parse an HTML document into its title and normalized visible text.
///
/// The title is the trimmed text of the first `<title>`, or `url` when that
/// is missing or blank. Text nodes are collected in document order, skipping
/// script-like elements and anything marked hidden.
pub fn parse_page(html: &str, url: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| url.to_string());

    let mut fragments = Vec::new();
    collect_visible_text(document.root_element(), &mut fragments);
    let text = normalize_whitespace(&fragments.join(" "));

    ParsedPage { title, text }
}

fn collect_visible_text(element: ElementRef<'_>, fragments: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    fragments.push(text.to_string());
                }
            }
            Node::Element(el) if !is_hidden(el) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_visible_text(child, fragments);
                }
            }
            _ => {}
        }
    }
}

fn is_hidden(element: &Element) -> bool {
    if NON_VISIBLE_ELEMENTS.contains(&element.name()) || element.attr("hidden").is_some() {
        return true;
    }

    if element
        .attr("aria-hidden")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    {
        return true;
    }

    element.attr("style").is_some_and(|style| {
        let style: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        style.contains("display:none") || style.contains("visibility:hidden")
    })
}

/// Fetches web pages and turns each into a single citation record
#[derive(Debug, Clone)]
pub struct WebExtractor {
    client: HttpClient,
    sink: Arc<dyn DiagnosticSink>,
}

impl WebExtractor {
    pub fn new(client: HttpClient, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { client, sink }
    }

    /// Fetch `url` and return zero or one record.
    ///
    /// Invalid URLs, network errors, timeouts and non-success statuses are
    /// reported and yield no record. There are no retries.
    pub async fn extract(&self, url: &str) -> Vec<CitationRecord> {
        match self.fetch(url).await {
            Ok(html) => {
                let page = parse_page(&html, url);
                vec![CitationRecord::web_page(page.title, page.text, url)]
            }
            Err(e) => {
                self.sink.failure(e);
                Vec::new()
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, CitationError> {
        let fetch_error = |reason: String| CitationError::WebFetch {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|e| fetch_error(format!("invalid URL: {}", e)))?;

        let response = self
            .client
            .client()
            .get(parsed)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    fetch_error(format!(
                        "timed out after {}s",
                        self.client.timeout().as_secs()
                    ))
                } else {
                    fetch_error(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("server returned status {}", status)));
        }

        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(format!("failed to read body: {}", e)))?;

        // A Content-Type charset wins; otherwise fall back to the page's own
        // <meta> declaration, then UTF-8.
        let fallback = sniff_meta_charset(&body).unwrap_or_else(|| "utf-8".to_string());
        let mut buffered = http::Response::new(body);
        if let Some(content_type) = content_type {
            buffered.headers_mut().insert(CONTENT_TYPE, content_type);
        }

        reqwest::Response::from(buffered)
            .text_with_charset(&fallback)
            .await
            .map_err(|e| fetch_error(format!("failed to decode body: {}", e)))
    }
}
