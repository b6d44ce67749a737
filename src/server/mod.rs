//! HTTP API.
//!
//! Exposes the summarizer, news feed, trust checker and chatbot as JSON
//! endpoints. See [`routes::create_router`] for the route table.

mod handlers;
mod routes;

pub use routes::create_router;

use itertools::Itertools;
use reqwest::Client;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::api::{InferenceProvider, SummarizeAsync};
use crate::chatbot::ChatClient;
use crate::config::Config;
use crate::engine::SummarizationEngine;
use crate::extractors::{web::WebExtractor, youtube::YouTubeExtractor};
use crate::news::NewsClient;
use crate::service::SummarizationService;
use crate::store::{EngagementStore, MemoryStore};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<SummarizationService<InferenceProvider>>,
    pub news: Arc<NewsClient>,
    pub store: Arc<dyn EngagementStore>,
    pub chat: Arc<ChatClient>,
    pub default_pdf_pages: usize,
    pub max_body_bytes: usize,
}

fn http_client(timeout: Duration, user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

impl AppState {
    /// Wire every component from `config`, with an empty engagement store.
    pub fn from_config(config: &Config) -> Result<Self, Box<dyn Error>> {
        let ua = &config.extractor.user_agent;
        let keys = &config.api_keys;

        let inference_client = http_client(config.summarizer.timeout(), ua)?;
        let providers: Vec<InferenceProvider> = config
            .summarizer
            .providers
            .iter()
            .cloned()
            .map(|spec| {
                InferenceProvider::new(
                    spec,
                    inference_client.clone(),
                    &config.summarizer.inference_url,
                    keys.huggingface.clone(),
                )
            })
            .collect();
        let engine = SummarizationEngine::from_config(providers, &config.summarizer);
        info!(
            chain = %engine.providers().iter().map(|p| p.name()).join(" -> "),
            "Summarization providers"
        );

        let web_client = http_client(Duration::from_secs(config.extractor.fetch_timeout_secs), ua)?;
        let web = WebExtractor::new(web_client);
        let youtube = YouTubeExtractor::new(
            http_client(Duration::from_secs(config.youtube.timeout_secs), ua)?,
            config.youtube.clone(),
            keys.youtube.clone(),
        );
        let summarizer =
            SummarizationService::new(engine, web, youtube, config.summarizer.source_cap_chars);

        let news = NewsClient::new(
            http_client(Duration::from_secs(config.news.timeout_secs), ua)?,
            config.news.clone(),
            keys.newsdata.clone(),
        );
        let chat = ChatClient::new(
            http_client(Duration::from_secs(config.chat.timeout_secs), ua)?,
            config.chat.clone(),
            keys.huggingface.clone(),
        );

        Ok(Self {
            summarizer: Arc::new(summarizer),
            news: Arc::new(news),
            store: Arc::new(MemoryStore::new()),
            chat: Arc::new(chat),
            default_pdf_pages: config.summarizer.default_pdf_pages,
            max_body_bytes: config.server.max_body_bytes,
        })
    }
}

/// Start the web server.
pub async fn serve(config: &Config) -> Result<(), Box<dyn Error>> {
    let state = AppState::from_config(config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, ?config.api_keys, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
