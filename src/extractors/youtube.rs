//! YouTube video text extraction.
//!
//! Text comes from the video's transcript when one exists. Two transcript
//! request styles are tried in order:
//!
//! 1. **Single call**: `GET /api/timedtext?v=<id>&lang=<lang>`
//! 2. **List then fetch**: `GET /api/timedtext?type=list&v=<id>`, pick a
//!    track (preferred language first), then fetch that track
//!
//! When neither yields a transcript and a YouTube Data API key is configured,
//! the video's title and description are used instead.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::ExtractionError;
use crate::config::YouTubeConfig;
use crate::models::{ExtractedContent, SourceKind};
use crate::utils::collapse_whitespace;

static VIDEO_ID_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("static regex"),
        Regex::new(r"youtu\.be/([0-9A-Za-z_-]{11})").expect("static regex"),
        Regex::new(r"embed/([0-9A-Za-z_-]{11})").expect("static regex"),
    ]
});

/// Extract the 11-character video id from a watch, short or embed URL.
pub fn extract_video_id(url: &str) -> Option<&str> {
    if url.is_empty() {
        return None;
    }
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `<transcript><text start=".." dur="..">...</text>...</transcript>`
#[derive(Debug, Default, Deserialize)]
struct TimedText {
    #[serde(rename = "text", default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(rename = "@start", default)]
    start: f64,
    #[serde(rename = "$text", default)]
    text: String,
}

/// `<transcript_list><track lang_code=".." name=".."/>...</transcript_list>`
#[derive(Debug, Default, Deserialize)]
struct TrackList {
    #[serde(rename = "track", default)]
    tracks: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
struct Track {
    #[serde(rename = "@lang_code")]
    lang_code: String,
    #[serde(rename = "@name", default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

/// Decode the caption markup left after XML parsing.
///
/// Timedtext escapes caption text twice, so `&#39;` and `&amp;` survive the
/// XML layer. Text that is not valid escaped markup (a bare `&`) is kept as is.
fn unescape_caption(text: &str) -> String {
    quick_xml::escape::unescape(text)
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| text.to_string())
}

/// Join transcript segments in temporal order.
fn join_segments(mut segments: Vec<Segment>) -> String {
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    let joined = segments
        .iter()
        .map(|s| unescape_caption(&s.text))
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined)
}

/// Parse a timedtext document. Empty or missing documents yield no segments.
fn parse_transcript(xml: &str) -> Result<Vec<Segment>, String> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }
    quick_xml::de::from_str::<TimedText>(xml)
        .map(|t| t.segments)
        .map_err(|e| format!("malformed transcript: {e}"))
}

/// Choose the track to fetch: exact language, then same base language, then the first.
fn pick_track<'a>(tracks: &'a [Track], language: &str) -> Option<&'a Track> {
    tracks
        .iter()
        .find(|t| t.lang_code == language)
        .or_else(|| {
            tracks
                .iter()
                .find(|t| t.lang_code.split('-').next() == Some(language))
        })
        .or_else(|| tracks.first())
}

/// Transcript request styles, in the order they are tried.
#[derive(Debug, Clone, Copy)]
enum TranscriptStyle {
    SingleCall,
    ListThenFetch,
}

/// Extracts text from YouTube videos.
#[derive(Debug, Clone)]
pub struct YouTubeExtractor {
    client: Client,
    config: YouTubeConfig,
    api_key: Option<String>,
}

impl YouTubeExtractor {
    /// Create an extractor against `config.base_url`.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client carrying the fetch timeout
    /// * `config` - Transcript host, Data API endpoint and preferred caption language
    /// * `api_key` - YouTube Data API key; without one there is no metadata fallback
    pub fn new(client: Client, config: YouTubeConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            config,
            api_key,
        }
    }

    fn timedtext_url(&self) -> String {
        format!("{}/api/timedtext", self.config.base_url.trim_end_matches('/'))
    }

    /// Extract text for the video referenced by `url`.
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractedContent)` - The transcript, or title and description when
    ///   no transcript exists and an API key is configured
    /// * `Err(ExtractionError::InvalidVideoUrl)` - No video id in `url`
    /// * `Err(ExtractionError::VideoNotFound)` - The Data API knows no such video
    /// * `Err(ExtractionError::TranscriptUnavailable)` - Neither source yielded text
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError> {
        let video_id = extract_video_id(url).ok_or(ExtractionError::InvalidVideoUrl)?;
        debug!(video_id, "Resolved video id");

        let transcript_err = match self.transcript(video_id).await {
            Ok(text) if !text.is_empty() => {
                info!(video_id, chars = text.chars().count(), "Fetched transcript");
                return Ok(ExtractedContent::new(SourceKind::YouTube, text));
            }
            Ok(_) => ExtractionError::EmptyTranscript,
            Err(cause) => ExtractionError::TranscriptUnavailable(cause),
        };

        let Some(api_key) = self.api_key.as_deref() else {
            warn!(video_id, error = %transcript_err, "No transcript and no metadata fallback configured");
            return Err(transcript_err);
        };

        warn!(video_id, error = %transcript_err, "Transcript unavailable; using video metadata");
        let text = self.metadata(video_id, api_key).await?;
        if text.is_empty() {
            return Err(transcript_err);
        }
        info!(video_id, chars = text.chars().count(), "Fetched video metadata");
        Ok(ExtractedContent::new(SourceKind::YouTube, text))
    }

    /// Try each transcript request style in turn.
    ///
    /// Returns `Ok("")` when a transcript exists but has no text, and `Err`
    /// with the last failure when no transcript was found at all.
    async fn transcript(&self, video_id: &str) -> Result<String, String> {
        let mut last_error = String::from("no transcript available");
        let mut found_empty = false;

        for style in [TranscriptStyle::SingleCall, TranscriptStyle::ListThenFetch] {
            let attempt = match style {
                TranscriptStyle::SingleCall => self.single_call(video_id).await,
                TranscriptStyle::ListThenFetch => self.list_then_fetch(video_id).await,
            };
            match attempt {
                Ok(segments) if segments.is_empty() => {
                    debug!(video_id, ?style, "No transcript segments");
                }
                Ok(segments) => {
                    let text = join_segments(segments);
                    if !text.is_empty() {
                        return Ok(text);
                    }
                    found_empty = true;
                }
                Err(e) => {
                    debug!(video_id, ?style, error = %e, "Transcript request failed");
                    last_error = e;
                }
            }
        }

        if found_empty {
            Ok(String::new())
        } else {
            Err(last_error)
        }
    }

    async fn fetch_xml(&self, query: &[(&str, &str)]) -> Result<String, String> {
        let response = self
            .client
            .get(self.timedtext_url())
            .query(query)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("timedtext returned HTTP {}", status.as_u16()));
        }
        response.text().await.map_err(|e| e.to_string())
    }

    async fn single_call(&self, video_id: &str) -> Result<Vec<Segment>, String> {
        let xml = self
            .fetch_xml(&[("v", video_id), ("lang", &self.config.language)])
            .await?;
        parse_transcript(&xml)
    }

    async fn list_then_fetch(&self, video_id: &str) -> Result<Vec<Segment>, String> {
        let xml = self.fetch_xml(&[("type", "list"), ("v", video_id)]).await?;
        let list = if xml.trim().is_empty() {
            TrackList::default()
        } else {
            quick_xml::de::from_str::<TrackList>(&xml)
                .map_err(|e| format!("malformed track list: {e}"))?
        };

        let track = pick_track(&list.tracks, &self.config.language)
            .ok_or_else(|| "no caption tracks listed".to_string())?;
        debug!(video_id, lang = %track.lang_code, "Fetching listed track");

        let xml = self
            .fetch_xml(&[
                ("v", video_id),
                ("lang", &track.lang_code),
                ("name", &track.name),
            ])
            .await?;
        parse_transcript(&xml)
    }

    /// Title and description from the Data API.
    async fn metadata(&self, video_id: &str, api_key: &str) -> Result<String, ExtractionError> {
        let url = format!("{}/videos", self.config.data_api_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[("part", "snippet"), ("id", video_id), ("key", api_key)])
            .send()
            .await
            .map_err(|e| ExtractionError::TranscriptUnavailable(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ExtractionError::VideoNotFound);
        }
        if !status.is_success() {
            return Err(ExtractionError::TranscriptUnavailable(format!(
                "metadata lookup returned HTTP {}",
                status.as_u16()
            )));
        }

        let list: VideoList = response
            .json()
            .await
            .map_err(|e| ExtractionError::TranscriptUnavailable(e.to_string()))?;
        let item = list
            .items
            .into_iter()
            .next()
            .ok_or(ExtractionError::VideoNotFound)?;

        Ok(collapse_whitespace(&format!(
            "{} {}",
            item.snippet.title, item.snippet.description
        )))
    }
}
