//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! command-line flags and environment variables (see [`crate::cli::Cli`]).
//!
//! ```yaml
//! server:
//!   port: 8080
//! summarizer:
//!   loading_backoff_ms: 2000
//!   providers:
//!     - model: facebook/bart-large-cnn
//!     - model: google/pegasus-xsum
//!       field: generated_text
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

use crate::cli::Cli;
use crate::models::ProviderSpec;

/// Top-level configuration for the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub summarizer: SummarizerConfig,
    pub extractor: ExtractorConfig,
    pub youtube: YouTubeConfig,
    pub news: NewsConfig,
    pub chat: ChatConfig,
    pub api_keys: ApiKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body (uploads included).
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Settings for the summarization fallback chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Base URL of the inference API; the model id is appended.
    pub inference_url: String,
    /// Providers in the order they are tried.
    pub providers: Vec<ProviderSpec>,
    pub timeout_secs: u64,
    /// Pause after a provider reports that its model is still loading.
    pub loading_backoff_ms: u64,
    /// Ceiling applied to every input before dispatch.
    pub max_input_chars: usize,
    /// Cap applied to URL, YouTube and PDF text before it reaches the engine.
    pub source_cap_chars: usize,
    /// Words kept in the local fallback excerpt.
    pub excerpt_words: usize,
    pub default_pdf_pages: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            inference_url: "https://api-inference.huggingface.co/models".to_string(),
            providers: ProviderSpec::default_chain(),
            timeout_secs: 60,
            loading_backoff_ms: 2000,
            max_input_chars: 3072,
            source_cap_chars: 5000,
            excerpt_words: 200,
            default_pdf_pages: 5,
        }
    }
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn loading_backoff(&self) -> Duration {
        Duration::from_millis(self.loading_backoff_ms)
    }
}

/// Settings for fetching web pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Settings for YouTube transcript and metadata lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// Origin serving the timedtext transcript API.
    pub base_url: String,
    /// YouTube Data API base, used for the metadata fallback.
    pub data_api_url: String,
    /// Preferred transcript language code.
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            data_api_url: "https://www.googleapis.com/youtube/v3".to_string(),
            language: "en".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Settings for the news aggregator feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub endpoint: String,
    pub language: String,
    pub max_articles: usize,
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsdata.io/api/1/news".to_string(),
            language: "en".to_string(),
            max_articles: 20,
            timeout_secs: 10,
        }
    }
}

/// Settings for the chatbot proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Base of an OpenAI-compatible API; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.huggingface.co/v1".to_string(),
            model: "deepseek-ai/DeepSeek-R1:fireworks-ai".to_string(),
            temperature: 0.3,
            max_tokens: 500,
            timeout_secs: 60,
        }
    }
}

/// Credentials for the upstream APIs.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    pub huggingface: Option<String>,
    pub newsdata: Option<String>,
    pub youtube: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("huggingface", &self.huggingface.is_some())
            .field("newsdata", &self.newsdata.is_some())
            .field("youtube", &self.youtube.is_some())
            .finish()
    }
}

impl Config {
    /// Parse a configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load configuration from `path`, or fall back to defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await?;
                let config = Self::from_yaml(&raw)?;
                info!(path, providers = config.summarizer.providers.len(), "Loaded configuration");
                Ok(config)
            }
            None => {
                info!("No config file given; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply command-line flags and environment variables on top of the file.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if cli.huggingface_api_key.is_some() {
            self.api_keys.huggingface = cli.huggingface_api_key.clone();
        }
        if cli.newsdata_api_key.is_some() {
            self.api_keys.newsdata = cli.newsdata_api_key.clone();
        }
        if cli.youtube_api_key.is_some() {
            self.api_keys.youtube = cli.youtube_api_key.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummaryField;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.max_body_bytes, 16 * 1024 * 1024);
        assert_eq!(config.summarizer.providers.len(), 3);
        assert_eq!(config.summarizer.max_input_chars, 3072);
        assert_eq!(config.summarizer.source_cap_chars, 5000);
        assert_eq!(config.summarizer.loading_backoff(), Duration::from_secs(2));
        assert_eq!(config.summarizer.timeout(), Duration::from_secs(60));
        assert_eq!(config.extractor.fetch_timeout_secs, 10);
        assert_eq!(config.summarizer.default_pdf_pages, 5);
        assert_eq!(config.news.max_articles, 20);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  port: 8080
summarizer:
  loading_backoff_ms: 0
  providers:
    - model: only/one
      field: generated_text
      max_length: 60
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.summarizer.providers.len(), 1);
        assert_eq!(config.summarizer.providers[0].field, SummaryField::GeneratedText);
        assert_eq!(config.summarizer.providers[0].max_length, 60);
        assert_eq!(config.summarizer.providers[0].min_length, 30);
        assert_eq!(config.summarizer.max_input_chars, 3072);
        assert_eq!(config.chat.max_tokens, 500);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "flashpress_news",
            "--port",
            "9000",
            "--huggingface-api-key",
            "hf_test",
        ]);
        let config = Config::default().apply_cli(&cli);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.api_keys.huggingface.as_deref(), Some("hf_test"));
    }

    #[test]
    fn test_api_keys_debug_hides_values() {
        let keys = ApiKeys {
            huggingface: Some("secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{keys:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("huggingface: true"));
    }

    #[tokio::test]
    async fn test_load_without_path() {
        let config = Config::load(None).await.unwrap();
        assert_eq!(config.server.port, 5000);
    }
}
