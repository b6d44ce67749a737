//! Web page text extraction.
//!
//! Fetches a page with a browser-like client identity, then joins the text of
//! every `<p>` element. Text inside `<script>` and `<style>` never contributes,
//! even when a paragraph wraps one of them.

use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info, instrument, warn};

use super::ExtractionError;
use crate::models::{ExtractedContent, SourceKind};
use crate::utils::collapse_whitespace;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));

/// Extracts paragraph text from web pages.
#[derive(Debug, Clone)]
pub struct WebExtractor {
    client: Client,
}

impl WebExtractor {
    /// `client` should carry the fetch timeout and user agent.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch `url` and extract its paragraph text.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractionError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The page body may still carry readable text (soft paywalls, 404 pages
            // with content), so keep going.
            warn!(status = status.as_u16(), "Page fetch returned non-success status");
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Fetch(e.to_string()))?;
        debug!(bytes = body.len(), "Fetched page");

        let text = paragraph_text(&body);
        if text.is_empty() {
            return Err(ExtractionError::NoParagraphText);
        }

        info!(chars = text.chars().count(), "Extracted page text");
        Ok(ExtractedContent::new(SourceKind::Url, text))
    }
}

/// Join the trimmed text of every paragraph with single spaces.
pub fn paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| {
            let mut buf = String::new();
            visible_text(p, &mut buf);
            collapse_whitespace(&buf)
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collect text under `element`, skipping script and style subtrees.
fn visible_text(element: ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(el) if matches!(el.name(), "script" | "style") => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    visible_text(child_el, buf);
                }
            }
            _ => {}
        }
    }
}
