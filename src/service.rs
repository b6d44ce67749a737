//! Summarization orchestration.
//!
//! [`SummarizationService`] routes each request to its extractor, caps the
//! extracted text, and hands it to the [`SummarizationEngine`]. It is the only
//! place that turns a request into a [`SummaryResult`]:
//!
//! - missing payloads fail with 400 before anything is fetched
//! - extraction failures fail with the extractor's reason and status
//! - everything else succeeds or degrades inside the engine

use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::api::SummarizeAsync;
use crate::engine::SummarizationEngine;
use crate::extractors::youtube::YouTubeExtractor;
use crate::extractors::{ExtractionError, pdf, web::WebExtractor};
use crate::models::{ExtractedContent, SourceKind, SummarizationRequest, SummaryResult};

/// Orchestrates extraction and summarization for every source kind.
#[derive(Debug)]
pub struct SummarizationService<P> {
    engine: SummarizationEngine<P>,
    web: WebExtractor,
    youtube: YouTubeExtractor,
    source_cap_chars: usize,
}

impl<P> SummarizationService<P>
where
    P: SummarizeAsync,
{
    /// `source_cap_chars` bounds extracted text; plain text requests are only
    /// bounded by the engine's own input cap.
    pub fn new(
        engine: SummarizationEngine<P>,
        web: WebExtractor,
        youtube: YouTubeExtractor,
        source_cap_chars: usize,
    ) -> Self {
        Self {
            engine,
            web,
            youtube,
            source_cap_chars,
        }
    }

    /// Summarize one request. Always returns a result, never an error.
    #[instrument(level = "info", skip_all, fields(kind = %request.kind()))]
    pub async fn summarize(&self, request: SummarizationRequest) -> SummaryResult {
        let t0 = Instant::now();
        let kind = request.kind();

        let content = match self.extract(request).await {
            Ok(content) => content,
            Err(e) => {
                warn!(%kind, error = %e, "Extraction failed");
                return SummaryResult::failed(e.to_string(), e.status_code());
            }
        };
        let text = match content.origin {
            SourceKind::Text => content.text,
            _ => {
                let content = content.capped(self.source_cap_chars);
                debug!(origin = %content.origin, chars = content.text.chars().count(), "Extracted source text");
                content.text
            }
        };

        let result = self.engine.summarize(&text).await;
        info!(
            %kind,
            degraded = matches!(result, SummaryResult::Degraded { .. }),
            summary_chars = result.summary().map_or(0, |s| s.chars().count()),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Summarization finished"
        );
        result
    }

    /// Turn a request into source text.
    ///
    /// Text is passed through untouched; every other kind goes to its
    /// extractor. An empty text or URL is [`ExtractionError::MissingInput`].
    async fn extract(&self, request: SummarizationRequest) -> Result<ExtractedContent, ExtractionError> {
        match request {
            SummarizationRequest::Text(text) if text.is_empty() => {
                Err(ExtractionError::MissingInput("text"))
            }
            SummarizationRequest::Text(text) => Ok(ExtractedContent::new(SourceKind::Text, text)),
            SummarizationRequest::Url(url) if url.is_empty() => Err(ExtractionError::MissingInput("URL")),
            SummarizationRequest::Url(url) => self.web.extract(&url).await,
            SummarizationRequest::YouTube(url) => self.youtube.extract(&url).await,
            SummarizationRequest::Pdf { document, pages } => pdf::extract(document, pages).await,
        }
    }
}
