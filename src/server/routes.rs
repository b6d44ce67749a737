//! Router configuration for the web server.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers;

/// Summarizer endpoints, mounted under both prefixes.
fn summarizer_routes() -> Router<AppState> {
    Router::new()
        .route("/text", post(handlers::summarize_text))
        .route("/url", post(handlers::summarize_url))
        .route("/youtube", post(handlers::summarize_youtube))
        .route("/pdf", post(handlers::summarize_pdf))
}

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/summarizer", summarizer_routes())
        .nest("/summarize", summarizer_routes())
        // News feed and engagement
        .route("/api/news/fetch", get(handlers::news_fetch))
        .route("/api/news/like", post(handlers::news_like))
        .route("/api/news/comment", post(handlers::news_comment))
        .route("/api/fake-news/check", post(handlers::fake_news_check))
        .route("/api/chatbot/chat", post(handlers::chatbot_chat))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
