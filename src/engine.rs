//! The summarization fallback chain.
//!
//! [`SummarizationEngine`] tries an ordered list of providers one at a time
//! and returns the first non-empty summary. When every provider fails it
//! builds a local excerpt instead, so callers always get readable output.
//!
//! # Per-provider handling
//!
//! | Provider outcome | Engine reaction |
//! |------------------|-----------------|
//! | Non-empty summary | Return [`SummaryResult::Success`] immediately |
//! | Model loading (503) | Sleep the loading backoff, move to the next provider |
//! | Any other error | Log it, move to the next provider |
//!
//! Providers are never retried and never raced; worst-case latency is the sum
//! of per-call timeouts plus one backoff per loading provider.

use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, instrument, warn};

use crate::api::{ProviderError, SummarizeAsync};
use crate::config::SummarizerConfig;
use crate::models::SummaryResult;
use crate::utils::{excerpt, truncate_chars};

/// Ordered fallback chain over providers of type `P`.
#[derive(Debug)]
pub struct SummarizationEngine<P> {
    providers: Vec<P>,
    max_input_chars: usize,
    loading_backoff: Duration,
    excerpt_words: usize,
}

impl<P> SummarizationEngine<P>
where
    P: SummarizeAsync,
{
    /// Create an engine over `providers`, tried in the given order.
    ///
    /// # Arguments
    ///
    /// * `providers` - Fallback chain; the first success wins
    /// * `max_input_chars` - Input is truncated to this many characters before any call
    /// * `loading_backoff` - Pause before moving on from a provider that reports it is still loading
    /// * `excerpt_words` - Length of the local excerpt served when every provider fails
    pub fn new(
        providers: Vec<P>,
        max_input_chars: usize,
        loading_backoff: Duration,
        excerpt_words: usize,
    ) -> Self {
        Self {
            providers,
            max_input_chars,
            loading_backoff,
            excerpt_words,
        }
    }

    /// Build an engine using the limits from `config`.
    pub fn from_config(providers: Vec<P>, config: &SummarizerConfig) -> Self {
        Self::new(
            providers,
            config.max_input_chars,
            config.loading_backoff(),
            config.excerpt_words,
        )
    }

    pub fn providers(&self) -> &[P] {
        &self.providers
    }

    /// Summarize `text`.
    ///
    /// # Returns
    ///
    /// Never fails: the result is either [`SummaryResult::Success`] with the
    /// first provider's summary or [`SummaryResult::Degraded`] with an excerpt
    /// of the input. Empty input degrades to `"..."`.
    #[instrument(level = "info", skip_all, fields(input_chars = text.chars().count()))]
    pub async fn summarize(&self, text: &str) -> SummaryResult {
        let total_t0 = Instant::now();
        let text = truncate_chars(text, self.max_input_chars);

        for (position, provider) in self.providers.iter().enumerate() {
            let attempt_t0 = Instant::now();
            match provider.summarize(text).await {
                Ok(summary) if !summary.trim().is_empty() => {
                    info!(
                        provider = provider.name(),
                        position,
                        elapsed_ms_attempt = attempt_t0.elapsed().as_millis() as u64,
                        elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                        "Provider returned a summary"
                    );
                    return SummaryResult::success(summary);
                }
                Ok(_) => {
                    warn!(provider = provider.name(), position, "Provider returned an empty summary");
                }
                Err(ProviderError::Loading) => {
                    warn!(
                        provider = provider.name(),
                        position,
                        backoff = ?self.loading_backoff,
                        "Model is loading; moving to next provider"
                    );
                    sleep(self.loading_backoff).await;
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        position,
                        elapsed_ms_attempt = attempt_t0.elapsed().as_millis() as u64,
                        error = %e,
                        "Provider failed; moving to next provider"
                    );
                }
            }
        }

        warn!(
            providers = self.providers.len(),
            elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
            "No provider produced a summary; using local excerpt"
        );
        SummaryResult::degraded(excerpt(text, self.excerpt_words))
    }
}
