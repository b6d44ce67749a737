//! PDF text extraction.
//!
//! The document is loaded once, then only the leading `min(requested, total)`
//! pages are rendered to text with `pdf-extract`. Parsing runs on the blocking
//! pool, since it is CPU-bound and can panic on malformed input.

use pdf_extract::{Document, PlainTextOutput, output_doc_page};
use tracing::{debug, info, instrument, warn};

use super::ExtractionError;
use crate::models::{ExtractedContent, SourceKind};

/// Text of the leading pages of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfText {
    /// Rendered text of each page read, in page order.
    pub pages: Vec<String>,
    /// Page count of the whole document.
    pub total_pages: usize,
}

impl PdfText {
    pub fn pages_read(&self) -> usize {
        self.pages.len()
    }

    /// Concatenated text, each page followed by a single space.
    pub fn text(&self) -> String {
        join_pages(&self.pages)
    }
}

/// Concatenate page texts, each followed by a single space.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref());
        text.push(' ');
    }
    text
}

fn invalid(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::InvalidDocument(e.to_string())
}

/// Render the first `max_pages` pages of `document`.
///
/// # Arguments
///
/// * `document` - Raw PDF bytes
/// * `max_pages` - Upper bound on pages to render; pages past it are never touched
///
/// # Returns
///
/// The per-page text of `min(max_pages, total)` pages plus the document's total
/// page count, or [`ExtractionError::InvalidDocument`] when the bytes do not
/// parse or a page fails to render.
pub fn leading_pages(document: &[u8], max_pages: usize) -> Result<PdfText, ExtractionError> {
    let mut doc = Document::load_mem(document).map_err(invalid)?;
    if doc.is_encrypted() {
        doc.decrypt("").map_err(invalid)?;
    }

    let total_pages = doc.get_pages().len();
    let wanted = max_pages.min(total_pages);
    let mut pages = Vec::with_capacity(wanted);
    for page_num in 1..=wanted as u32 {
        let mut text = String::new();
        {
            let mut output = PlainTextOutput::new(&mut text);
            output_doc_page(&doc, &mut output, page_num).map_err(invalid)?;
        }
        pages.push(text);
    }
    debug!(pages_read = pages.len(), total_pages, "Rendered PDF pages");

    Ok(PdfText { pages, total_pages })
}

/// Extract text from up to `max_pages` leading pages of `document`.
///
/// # Returns
///
/// * `Ok(ExtractedContent)` - The joined page text
/// * `Err(ExtractionError::InvalidDocument)` - The upload is not a readable PDF
/// * `Err(ExtractionError::EmptyDocument)` - The requested pages carry no text
#[instrument(level = "info", skip_all, fields(bytes = document.len(), max_pages))]
pub async fn extract(document: Vec<u8>, max_pages: usize) -> Result<ExtractedContent, ExtractionError> {
    let pdf = tokio::task::spawn_blocking(move || leading_pages(&document, max_pages))
        .await
        .map_err(|e| ExtractionError::InvalidDocument(format!("parser aborted: {e}")))??;
    let text = pdf.text();

    if text.trim().is_empty() {
        warn!(
            pages_read = pdf.pages_read(),
            total_pages = pdf.total_pages,
            "No text layer in the requested pages"
        );
        return Err(ExtractionError::EmptyDocument);
    }

    info!(
        pages_read = pdf.pages_read(),
        total_pages = pdf.total_pages,
        chars = text.chars().count(),
        "Extracted PDF text"
    );
    Ok(ExtractedContent::new(SourceKind::Pdf, text))
}
