//! Data models for summarization requests, results and news articles.
//!
//! This module defines the core data structures used throughout the service:
//! - [`SummarizationRequest`]: What the caller asked to summarize
//! - [`ExtractedContent`]: Plain text pulled out of a source, tagged with its origin
//! - [`ProviderSpec`]: One entry of the summarization fallback chain
//! - [`SummaryResult`]: The outcome handed back to every caller
//! - [`Envelope`]: The `{success, summary|error}` JSON shape the frontend reads
//! - [`Article`]: A news item decorated with likes and comments

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of source a summarization request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Url,
    YouTube,
    Pdf,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Text => "text",
            SourceKind::Url => "url",
            SourceKind::YouTube => "youtube",
            SourceKind::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

/// A request to summarize one piece of content.
///
/// The payload is owned so the request can be moved into the service without
/// borrowing from the HTTP layer.
#[derive(Debug, Clone)]
pub enum SummarizationRequest {
    /// Raw text supplied by the caller.
    Text(String),
    /// A web page to fetch and strip down to paragraph text.
    Url(String),
    /// Any YouTube URL shape (watch, short or embed).
    YouTube(String),
    /// A PDF document and the number of leading pages to read.
    Pdf { document: Vec<u8>, pages: usize },
}

impl SummarizationRequest {
    pub fn kind(&self) -> SourceKind {
        match self {
            SummarizationRequest::Text(_) => SourceKind::Text,
            SummarizationRequest::Url(_) => SourceKind::Url,
            SummarizationRequest::YouTube(_) => SourceKind::YouTube,
            SummarizationRequest::Pdf { .. } => SourceKind::Pdf,
        }
    }
}

/// Plain text extracted from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Where the text came from.
    pub origin: SourceKind,
    /// The extracted text, unbounded until capped.
    pub text: String,
}

impl ExtractedContent {
    pub fn new(origin: SourceKind, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
        }
    }

    /// Cap the text to at most `max_chars` characters.
    pub fn capped(mut self, max_chars: usize) -> Self {
        let end = crate::utils::truncate_chars(&self.text, max_chars).len();
        self.text.truncate(end);
        self
    }
}

/// Which JSON key a provider is expected to put its summary under.
///
/// The parser always tries the preferred key first and the other one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryField {
    #[default]
    SummaryText,
    GeneratedText,
}

impl SummaryField {
    pub fn key(self) -> &'static str {
        match self {
            SummaryField::SummaryText => "summary_text",
            SummaryField::GeneratedText => "generated_text",
        }
    }

    /// The other known key, used as a fallback.
    pub fn other(self) -> Self {
        match self {
            SummaryField::SummaryText => SummaryField::GeneratedText,
            SummaryField::GeneratedText => SummaryField::SummaryText,
        }
    }
}

/// One entry in the ordered summarization fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Model identifier, appended to the inference base URL.
    pub model: String,
    /// Upper bound on the generated summary length (tokens).
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    /// Lower bound on the generated summary length (tokens).
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    /// Whether the provider should sample instead of decoding greedily.
    #[serde(default)]
    pub do_sample: bool,
    /// Preferred response key.
    #[serde(default)]
    pub field: SummaryField,
}

fn default_max_length() -> u32 {
    150
}

fn default_min_length() -> u32 {
    30
}

impl ProviderSpec {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            max_length: default_max_length(),
            min_length: default_min_length(),
            do_sample: false,
            field: SummaryField::default(),
        }
    }

    /// The default chain: a general abstractive summarizer, a distilled
    /// variant and an extreme-summarization model.
    pub fn default_chain() -> Vec<Self> {
        vec![
            Self::new("facebook/bart-large-cnn"),
            Self::new("sshleifer/distilbart-cnn-12-6"),
            Self::new("google/pegasus-xsum"),
        ]
    }
}

/// Reason attached to every degraded summary.
pub const DEGRADED_REASON: &str = "no provider returned usable output, local excerpt used";

/// The outcome of a summarization request.
///
/// Every request path ends in exactly one of these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResult {
    /// A provider produced a summary.
    Success { summary: String },
    /// No provider produced usable output; `summary` is a local excerpt.
    Degraded { summary: String, reason: String },
    /// The request could not be summarized at all.
    Failed { reason: String, status: u16 },
}

impl SummaryResult {
    pub fn success(summary: impl Into<String>) -> Self {
        SummaryResult::Success {
            summary: summary.into(),
        }
    }

    pub fn degraded(summary: impl Into<String>) -> Self {
        SummaryResult::Degraded {
            summary: summary.into(),
            reason: DEGRADED_REASON.to_string(),
        }
    }

    pub fn failed(reason: impl Into<String>, status: u16) -> Self {
        SummaryResult::Failed {
            reason: reason.into(),
            status,
        }
    }

    /// The summary text, absent only for failures.
    pub fn summary(&self) -> Option<&str> {
        match self {
            SummaryResult::Success { summary } | SummaryResult::Degraded { summary, .. } => {
                Some(summary)
            }
            SummaryResult::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SummaryResult::Failed { .. })
    }

    /// HTTP status the result should be reported with.
    pub fn status(&self) -> u16 {
        match self {
            SummaryResult::Failed { status, .. } => *status,
            _ => 200,
        }
    }
}

/// The uniform JSON envelope consumed by the presentation layer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

impl From<&SummaryResult> for Envelope {
    fn from(result: &SummaryResult) -> Self {
        match result {
            SummaryResult::Success { summary } => Envelope {
                success: true,
                summary: Some(summary.clone()),
                error: None,
                degraded: false,
            },
            SummaryResult::Degraded { summary, .. } => Envelope {
                success: true,
                summary: Some(summary.clone()),
                error: None,
                degraded: true,
            },
            SummaryResult::Failed { reason, .. } => Envelope {
                success: false,
                summary: None,
                error: Some(reason.clone()),
                degraded: false,
            },
        }
    }
}

/// A news article as served to the frontend.
///
/// Serialized field names follow the JSON the frontend already consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub source: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub likes: u64,
    pub comments: Vec<String>,
}

/// Likes and comments recorded against one article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Engagement {
    pub likes: u64,
    pub comments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_uses_frontend_field_names() {
        let article = Article {
            id: "a1".into(),
            title: "T".into(),
            description: "D".into(),
            image: String::new(),
            url: "#".into(),
            source: "Unknown".into(),
            pub_date: "2025-01-01 10:00:00".into(),
            likes: 2,
            comments: vec!["hi".into()],
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["pubDate"], "2025-01-01 10:00:00");
        assert!(json.get("pub_date").is_none());

        let back: Article = serde_json::from_value(json).unwrap();
        assert_eq!(back, article);
    }

    #[test]
    fn test_capped_respects_char_boundaries() {
        let content = ExtractedContent::new(SourceKind::Url, "héllo wörld");
        let capped = content.capped(4);
        assert_eq!(capped.text, "héll");
        assert_eq!(capped.origin, SourceKind::Url);
    }

    #[test]
    fn test_capped_leaves_short_text_alone() {
        let content = ExtractedContent::new(SourceKind::Pdf, "short");
        assert_eq!(content.capped(5000).text, "short");
    }

    #[test]
    fn test_summary_field_fallback() {
        assert_eq!(SummaryField::SummaryText.key(), "summary_text");
        assert_eq!(SummaryField::SummaryText.other(), SummaryField::GeneratedText);
        assert_eq!(SummaryField::GeneratedText.other().key(), "summary_text");
    }

    #[test]
    fn test_provider_spec_defaults_from_yaml() {
        let spec: ProviderSpec = serde_yaml::from_str("model: google/pegasus-xsum").unwrap();
        assert_eq!(spec, ProviderSpec::new("google/pegasus-xsum"));
        assert_eq!(spec.max_length, 150);
        assert_eq!(spec.min_length, 30);
        assert!(!spec.do_sample);
    }

    #[test]
    fn test_default_chain_order() {
        let chain = ProviderSpec::default_chain();
        let models: Vec<_> = chain.iter().map(|p| p.model.as_str()).collect();
        assert_eq!(
            models,
            vec![
                "facebook/bart-large-cnn",
                "sshleifer/distilbart-cnn-12-6",
                "google/pegasus-xsum"
            ]
        );
    }

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(Envelope::from(&SummaryResult::success("done"))).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "summary": "done"}));

        let degraded =
            serde_json::to_value(Envelope::from(&SummaryResult::degraded("..."))).unwrap();
        assert_eq!(
            degraded,
            serde_json::json!({"success": true, "summary": "...", "degraded": true})
        );

        let failed =
            serde_json::to_value(Envelope::from(&SummaryResult::failed("No text provided", 400)))
                .unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"success": false, "error": "No text provided"})
        );
    }

    #[test]
    fn test_result_status_and_summary() {
        assert_eq!(SummaryResult::success("a").status(), 200);
        assert_eq!(SummaryResult::degraded("b").summary(), Some("b"));
        let failed = SummaryResult::failed("nope", 404);
        assert!(failed.is_failed());
        assert_eq!(failed.status(), 404);
        assert_eq!(failed.summary(), None);
    }
}
