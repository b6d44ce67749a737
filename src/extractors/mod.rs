//! Content extractors that turn a source artifact into plain text.
//!
//! Each extractor produces an [`ExtractedContent`](crate::models::ExtractedContent)
//! or an [`ExtractionError`] describing why no usable text came out.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Web page | [`web`] | HTML scraping | Paragraph text only, script/style ignored |
//! | YouTube | [`youtube`] | timedtext API, Data API | Transcript first, metadata fallback |
//! | PDF | [`pdf`] | `pdf-extract` | Leading pages only |

pub mod pdf;
pub mod web;
pub mod youtube;

use thiserror::Error;

/// Why a source yielded no text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No {0} provided")]
    MissingInput(&'static str),

    #[error("Could not extract text from URL")]
    NoParagraphText,

    #[error("Could not fetch URL: {0}")]
    Fetch(String),

    #[error("Invalid YouTube URL")]
    InvalidVideoUrl,

    #[error("Video not found")]
    VideoNotFound,

    #[error("Could not fetch transcript: {0}")]
    TranscriptUnavailable(String),

    #[error("Transcript is empty")]
    EmptyTranscript,

    #[error("Could not read PDF: {0}")]
    InvalidDocument(String),

    #[error("Could not extract text from PDF")]
    EmptyDocument,
}

impl ExtractionError {
    /// HTTP status the failure is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            ExtractionError::MissingInput(_)
            | ExtractionError::InvalidVideoUrl
            | ExtractionError::InvalidDocument(_) => 400,
            ExtractionError::VideoNotFound => 404,
            _ => 500,
        }
    }
}
