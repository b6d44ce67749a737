//! Summarization provider interaction.
//!
//! This module talks to hosted summarization models over HTTP. It is split
//! the same way the engine consumes it:
//! - [`SummarizeAsync`]: Core trait, one call to one provider
//! - [`InferenceProvider`]: Implementation backed by a Hugging Face style
//!   inference endpoint described by a [`ProviderSpec`]
//! - [`InferenceResponse`]: Tagged parser for the two response shapes those
//!   endpoints return
//!
//! Retry policy lives in [`crate::engine`]; a provider makes exactly one
//! request per call and reports what went wrong through [`ProviderError`].

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{ProviderSpec, SummaryField};
use crate::utils::truncate_for_log;

/// Why a single provider call produced no summary.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The model is still being loaded on the provider side (HTTP 503).
    #[error("model is loading")]
    Loading,

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("response carried no summary")]
    Empty,
}

/// Trait for a single summarization backend.
///
/// Implementors make one attempt per call; the engine decides what happens
/// after a failure.
pub trait SummarizeAsync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Summarize `text`, returning a non-empty summary or the reason there is none.
    async fn summarize(&self, text: &str) -> Result<String, ProviderError>;
}

/// One output object from an inference endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct InferenceOutput {
    #[serde(default)]
    pub summary_text: Option<String>,
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl InferenceOutput {
    fn field(&self, field: SummaryField) -> Option<&str> {
        let value = match field {
            SummaryField::SummaryText => self.summary_text.as_deref(),
            SummaryField::GeneratedText => self.generated_text.as_deref(),
        };
        value.map(str::trim).filter(|s| !s.is_empty())
    }

    /// The preferred field if it carries text, otherwise the other known field.
    pub fn summary(&self, preferred: SummaryField) -> Option<&str> {
        self.field(preferred).or_else(|| self.field(preferred.other()))
    }
}

/// The two body shapes inference endpoints answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    /// `[{"summary_text": "..."}]`
    Batch(Vec<InferenceOutput>),
    /// `{"generated_text": "..."}` or `{"error": "..."}`
    Single(InferenceOutput),
}

impl InferenceResponse {
    pub fn parse(body: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))
    }

    /// Pull the summary out of whichever shape arrived.
    pub fn summary(&self, preferred: SummaryField) -> Option<&str> {
        match self {
            InferenceResponse::Batch(outputs) => {
                outputs.iter().find_map(|output| output.summary(preferred))
            }
            InferenceResponse::Single(output) => output.summary(preferred),
        }
    }

    /// Error message reported in the body, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            InferenceResponse::Batch(outputs) => outputs.iter().find_map(|o| o.error.as_deref()),
            InferenceResponse::Single(output) => output.error.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// A hosted summarization model reached through an inference endpoint.
#[derive(Debug, Clone)]
pub struct InferenceProvider {
    spec: ProviderSpec,
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl InferenceProvider {
    /// Create a provider for `spec`.
    ///
    /// `client` should already carry the per-call timeout.
    pub fn new(spec: ProviderSpec, client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            spec,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.spec.model)
    }
}

impl SummarizeAsync for InferenceProvider {
    fn name(&self) -> &str {
        &self.spec.model
    }

    #[instrument(level = "info", skip_all, fields(provider = %self.spec.model, chars = text.chars().count()))]
    async fn summarize(&self, text: &str) -> Result<String, ProviderError> {
        let t0 = Instant::now();
        let payload = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: self.spec.max_length,
                min_length: self.spec.min_length,
                do_sample: self.spec.do_sample,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(self.endpoint()).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();
        debug!(status = status.as_u16(), elapsed_ms = dt.as_millis() as u64, "Provider responded");

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ProviderError::Loading);
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body, 200),
            });
        }

        let parsed = InferenceResponse::parse(&body)?;
        match parsed.summary(self.spec.field) {
            Some(summary) => Ok(summary.to_string()),
            None => {
                if let Some(err) = parsed.error() {
                    warn!(error = %err, "Provider reported an error in a success response");
                } else {
                    debug!(field = self.spec.field.key(), "No summary text in response");
                }
                Err(ProviderError::Empty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer, spec: ProviderSpec) -> InferenceProvider {
        InferenceProvider::new(spec, Client::new(), &server.uri(), Some("hf_test".to_string()))
    }

    #[test]
    fn test_parse_batch_shape() {
        let parsed = InferenceResponse::parse(r#"[{"summary_text": " A summary. "}]"#).unwrap();
        assert_eq!(parsed.summary(SummaryField::SummaryText), Some("A summary."));
    }

    #[test]
    fn test_parse_single_shape_with_generated_text() {
        let parsed = InferenceResponse::parse(r#"{"generated_text": "Generated."}"#).unwrap();
        assert_eq!(parsed.summary(SummaryField::SummaryText), Some("Generated."));
        assert_eq!(parsed.summary(SummaryField::GeneratedText), Some("Generated."));
    }

    #[test]
    fn test_preferred_field_wins() {
        let body = r#"{"summary_text": "from summary", "generated_text": "from generated"}"#;
        let parsed = InferenceResponse::parse(body).unwrap();
        assert_eq!(parsed.summary(SummaryField::SummaryText), Some("from summary"));
        assert_eq!(parsed.summary(SummaryField::GeneratedText), Some("from generated"));
    }

    #[test]
    fn test_blank_fields_are_not_summaries() {
        let parsed = InferenceResponse::parse(r#"[{"summary_text": "   "}]"#).unwrap();
        assert_eq!(parsed.summary(SummaryField::SummaryText), None);

        let parsed = InferenceResponse::parse("[]").unwrap();
        assert_eq!(parsed.summary(SummaryField::SummaryText), None);
    }

    #[test]
    fn test_error_body() {
        let parsed = InferenceResponse::parse(r#"{"error": "Model too busy"}"#).unwrap();
        assert_eq!(parsed.summary(SummaryField::SummaryText), None);
        assert_eq!(parsed.error(), Some("Model too busy"));
    }

    #[test]
    fn test_unparseable_body() {
        assert!(matches!(
            InferenceResponse::parse("\"just a string\""),
            Err(ProviderError::Parse(_))
        ));
        assert!(matches!(
            InferenceResponse::parse("<html>oops</html>"),
            Err(ProviderError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_provider_sends_shaped_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/facebook/bart-large-cnn"))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_partial_json(serde_json::json!({
                "inputs": "Some article text",
                "parameters": {"max_length": 150, "min_length": 30, "do_sample": false},
                "options": {"wait_for_model": true}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"summary_text": "Short."}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let p = provider(&server, ProviderSpec::new("facebook/bart-large-cnn"));
        assert_eq!(p.summarize("Some article text").await.unwrap(), "Short.");
    }

    #[tokio::test]
    async fn test_provider_maps_503_to_loading() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let p = provider(&server, ProviderSpec::new("google/pegasus-xsum"));
        assert!(matches!(p.summarize("text").await, Err(ProviderError::Loading)));
    }

    #[tokio::test]
    async fn test_provider_maps_other_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let p = provider(&server, ProviderSpec::new("google/pegasus-xsum"));
        match p.summarize("text").await {
            Err(ProviderError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad token");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_provider_empty_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"summary_text": ""}])),
            )
            .mount(&server)
            .await;

        let p = provider(&server, ProviderSpec::new("google/pegasus-xsum"));
        assert!(matches!(p.summarize("text").await, Err(ProviderError::Empty)));
    }

    #[tokio::test]
    async fn test_provider_transport_error() {
        // Nothing listens on port 9 locally.
        let p = InferenceProvider::new(
            ProviderSpec::new("x/y"),
            Client::new(),
            "http://127.0.0.1:9",
            None,
        );
        assert!(matches!(p.summarize("text").await, Err(ProviderError::Transport(_))));
    }
}
