//! Source and text credibility heuristics.
//!
//! | Input | Rule | Verdict |
//! |-------|------|---------|
//! | URL   | host contains an allow-listed domain | `REAL` / High |
//! | URL   | otherwise | `UNVERIFIED` / Medium |
//! | Text  | two or more sensational phrases | `LIKELY FAKE` / Medium |
//! | Text  | otherwise | `NEEDS VERIFICATION` / Low |
//!
//! A URL wins when both are supplied. These are substring lookups, not
//! fact-checking.

use serde::Serialize;
use url::Url;

/// Outlets treated as trustworthy. Matched as substrings of the host.
pub const TRUSTED_SOURCES: &[&str] = &[
    "thehindu.com",
    "timesofdindia.indiatimes.com",
    "indianexpress.com",
    "hindustantimes.com",
    "ndtv.com",
    "business-standard.com",
    "livemint.com",
    "economictimes.indiatimes.com",
    "deccanherald.com",
    "telegraphindia.com",
    "dnaindia.com",
    "outlookindia.com",
    "news18.com",
    "ptinews.com",
    "dinathanthi.com",
    "dinamalar.com",
    "dinakaran.com",
    "maalaimalar.com",
    "puthiyathalaimurai.com",
    "polimernews.com",
    "suntv.com",
    "vikatan.com",
    "anandavikatan.com",
    "manoramaonline.com",
    "mathrubhumi.com",
    "eenadu.net",
    "sakshi.com",
    "lokmat.com",
    "gujaratsamachar.com",
    "erajasthanpatrika.com",
    "punjabkesari.in",
    "bbc.com",
    "reuters.com",
    "apnews.com",
    "theguardian.com",
    "cnn.com",
    "nytimes.com",
    "washingtonpost.com",
    "economist.com",
    "ft.com",
    "wsj.com",
    "bloomberg.com",
    "aljazeera.com",
    "news.sky.com",
    "abcnews.go.com",
    "cbsnews.com",
    "nbcnews.com",
    "foxnews.com",
    "thetimes.co.uk",
    "nature.com",
    "sciencemag.org",
    "techcrunch.com",
    "wired.com",
    "theverge.com",
    "forbes.com",
    "cnet.com",
];

/// Lowercase phrases typical of sensational or scam copy.
pub const SENSATIONAL_INDICATORS: &[&str] = &[
    "clickbait",
    "shocking",
    "you won't believe",
    "miracle cure",
    "breaking:",
    "urgent:",
    "act now",
    "limited time",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "REAL")]
    Real,
    #[serde(rename = "UNVERIFIED")]
    Unverified,
    #[serde(rename = "LIKELY FAKE")]
    LikelyFake,
    #[serde(rename = "NEEDS VERIFICATION")]
    NeedsVerification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustVerdict {
    pub result: Verdict,
    pub confidence: Confidence,
    pub message: &'static str,
}

/// Lowercased host with every `www.` removed; empty when `raw` has no host.
fn normalized_host(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
        .replace("www.", "")
}

pub fn check_url(raw: &str) -> TrustVerdict {
    let host = normalized_host(raw);
    let trusted = !host.is_empty() && TRUSTED_SOURCES.iter().any(|d| host.contains(d));
    if trusted {
        TrustVerdict {
            result: Verdict::Real,
            confidence: Confidence::High,
            message: "This source is from a trusted news outlet.",
        }
    } else {
        TrustVerdict {
            result: Verdict::Unverified,
            confidence: Confidence::Medium,
            message: "This source is not in our trusted list. Verify from multiple sources.",
        }
    }
}

/// Number of distinct indicator phrases present in `text`.
pub fn indicator_count(text: &str) -> usize {
    let lower = text.to_lowercase();
    SENSATIONAL_INDICATORS
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .count()
}

pub fn check_text(text: &str) -> TrustVerdict {
    if indicator_count(text) >= 2 {
        TrustVerdict {
            result: Verdict::LikelyFake,
            confidence: Confidence::Medium,
            message: "Text contains multiple sensational indicators. Verify from trusted sources.",
        }
    } else {
        TrustVerdict {
            result: Verdict::NeedsVerification,
            confidence: Confidence::Low,
            message: "Unable to determine authenticity. Cross-check with trusted news sources.",
        }
    }
}

/// Check a URL if one is given, else the text. `None` when both are empty.
pub fn check(text: Option<&str>, url: Option<&str>) -> Option<TrustVerdict> {
    match (url.filter(|u| !u.is_empty()), text.filter(|t| !t.is_empty())) {
        (Some(url), _) => Some(check_url(url)),
        (None, Some(text)) => Some(check_text(text)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trusted_host_variants() {
        for url in [
            "https://www.bbc.com/news/world-123",
            "https://WWW.Reuters.COM/markets",
            "http://edition.cnn.com/2025/story",
            "https://news.sky.com/story/x",
        ] {
            assert_eq!(check_url(url).result, Verdict::Real, "{url}");
            assert_eq!(check_url(url).confidence, Confidence::High);
        }
    }

    #[test]
    fn test_unknown_or_malformed_host_is_unverified() {
        for url in ["https://totally-real-news.example/post", "not a url", "file:///tmp/x"] {
            let verdict = check_url(url);
            assert_eq!(verdict.result, Verdict::Unverified, "{url}");
            assert_eq!(verdict.confidence, Confidence::Medium);
        }
    }

    #[test]
    fn test_text_indicator_threshold() {
        assert_eq!(indicator_count("A calm report on rainfall."), 0);
        assert_eq!(check_text("SHOCKING news").result, Verdict::NeedsVerification);

        let verdict = check_text("SHOCKING! You won't believe this miracle cure");
        assert_eq!(verdict.result, Verdict::LikelyFake);
        assert_eq!(verdict.confidence, Confidence::Medium);
    }

    #[test]
    fn test_repeated_phrase_counts_once() {
        assert_eq!(indicator_count("shocking shocking shocking"), 1);
    }

    #[test]
    fn test_url_takes_precedence() {
        let verdict = check(Some("shocking miracle cure, act now"), Some("https://bbc.com/x")).unwrap();
        assert_eq!(verdict.result, Verdict::Real);

        let verdict = check(Some("shocking miracle cure"), Some("")).unwrap();
        assert_eq!(verdict.result, Verdict::LikelyFake);

        assert!(check(None, None).is_none());
        assert!(check(Some(""), Some("")).is_none());
    }

    #[test]
    fn test_labels_serialize_verbatim() {
        let json = serde_json::to_value(check_text("clickbait, act now")).unwrap();
        assert_eq!(json["result"], "LIKELY FAKE");
        assert_eq!(json["confidence"], "Medium");
    }
}
