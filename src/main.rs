//! # FlashPress News
//!
//! Backend for a news reading app. It summarizes content from several kinds of
//! source through a fallback chain of hosted summarization models, and serves a
//! news feed, a source-credibility check and a news chatbot as JSON endpoints.
//!
//! ## Features
//!
//! - Summarizes raw text, web pages, YouTube videos and PDF uploads
//! - Tries an ordered chain of inference models, waiting out cold starts and
//!   degrading to a local excerpt when no model answers
//! - Proxies a news aggregator with in-memory likes and comments
//! - Flags untrusted domains and sensational wording
//! - Forwards questions to a chat-completions model under a news-assistant prompt
//!
//! ## Usage
//!
//! ```sh
//! HUGGINGFACE_API_KEY=hf_... flashpress_news --config flashpress.yaml --port 5000
//! ```
//!
//! ## Architecture
//!
//! | Layer | Module | Role |
//! |-------|--------|------|
//! | HTTP | [`server`] | axum routes, request parsing, JSON envelopes |
//! | Orchestration | [`service`] | extraction, length caps, result mapping |
//! | Extraction | [`extractors`] | web paragraphs, YouTube transcripts, PDF pages |
//! | Summarization | [`engine`], [`api`] | provider chain and inference client |
//! | Side features | [`news`], [`store`], [`trust`], [`chatbot`] | feed, engagement, heuristics, chat |

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod chatbot;
mod cli;
mod config;
mod engine;
mod extractors;
mod models;
mod news;
mod server;
mod service;
mod store;
mod trust;
mod utils;

use cli::Cli;
use config::Config;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is fine; real environment variables still apply.
    let dotenv = dotenvy::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("flashpress_news starting up");
    debug!(?dotenv, "Environment file");

    let args = Cli::parse();
    debug!(?args.config, ?args.host, ?args.port, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref()).await?.apply_cli(&args);
    debug!(?config, "Effective configuration");

    server::serve(&config).await
}
