//! Route handlers.
//!
//! Every handler answers with a JSON object carrying `success`. Failures add
//! `error` and a non-2xx status; handlers never panic on bad input.

use axum::{
    Json,
    extract::{Multipart, Query, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::AppState;
use crate::models::{Envelope, SummarizationRequest, SummaryResult};
use crate::news::NewsError;
use crate::trust;

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(json!({"success": false, "error": error.into()}))).into_response()
}

fn summary_response(result: &SummaryResult) -> Response {
    if result.is_failed() {
        debug!(status = result.status(), "Summarization request failed");
    }
    let status =
        StatusCode::from_u16(result.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(Envelope::from(result))).into_response()
}

pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

// --- Summarizer ---

#[derive(Debug, Default, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UrlBody {
    #[serde(default)]
    url: String,
}

pub async fn summarize_text(
    State(state): State<AppState>,
    body: Option<Json<TextBody>>,
) -> Response {
    let Json(body) = body.unwrap_or_default();
    let result = state
        .summarizer
        .summarize(SummarizationRequest::Text(body.text))
        .await;
    summary_response(&result)
}

pub async fn summarize_url(State(state): State<AppState>, body: Option<Json<UrlBody>>) -> Response {
    let Json(body) = body.unwrap_or_default();
    let result = state
        .summarizer
        .summarize(SummarizationRequest::Url(body.url))
        .await;
    summary_response(&result)
}

pub async fn summarize_youtube(
    State(state): State<AppState>,
    body: Option<Json<UrlBody>>,
) -> Response {
    let Json(body) = body.unwrap_or_default();
    let result = state
        .summarizer
        .summarize(SummarizationRequest::YouTube(body.url))
        .await;
    summary_response(&result)
}

/// Multipart upload with a `file` part and an optional `num_pages` part.
pub async fn summarize_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            debug!(error = %e, "Not a multipart upload");
            return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
        }
    };

    let mut document = None;
    let mut pages = state.default_pdf_pages;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
        };
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => match field.bytes().await {
                Ok(bytes) => document = Some(bytes.to_vec()),
                Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
            },
            Some("num_pages") => {
                let raw = match field.text().await {
                    Ok(raw) => raw,
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
                };
                match raw.trim().parse::<usize>() {
                    Ok(n) => pages = n,
                    Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid num_pages"),
                }
            }
            _ => {}
        }
    }

    let Some(document) = document else {
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };
    let result = state
        .summarizer
        .summarize(SummarizationRequest::Pdf { document, pages })
        .await;
    summary_response(&result)
}

// --- News ---

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EngagementBody {
    article_id: Option<String>,
    comment: Option<String>,
}

pub async fn news_fetch(State(state): State<AppState>, Query(query): Query<NewsQuery>) -> Response {
    match state
        .news
        .fetch(query.category.as_deref(), state.store.as_ref())
        .await
    {
        Ok(articles) => Json(json!({"success": true, "articles": articles})).into_response(),
        Err(e @ NewsError::NoArticles) => error_response(StatusCode::NOT_FOUND, e.to_string()),
        Err(e) => {
            warn!(error = %e, "News fetch failed");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

fn article_id(body: &EngagementBody) -> Option<&str> {
    body.article_id.as_deref().filter(|id| !id.is_empty())
}

pub async fn news_like(
    State(state): State<AppState>,
    body: Option<Json<EngagementBody>>,
) -> Response {
    let Json(body) = body.unwrap_or_default();
    let Some(id) = article_id(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "No article_id provided");
    };
    let likes = state.store.like(id);
    Json(json!({"success": true, "likes": likes})).into_response()
}

pub async fn news_comment(
    State(state): State<AppState>,
    body: Option<Json<EngagementBody>>,
) -> Response {
    let Json(body) = body.unwrap_or_default();
    let Some(id) = article_id(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "No article_id provided");
    };
    let Some(comment) = body.comment.clone().filter(|c| !c.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "No comment provided");
    };
    let comments = state.store.comment(id, comment);
    Json(json!({"success": true, "comments": comments})).into_response()
}

// --- Trust checker ---

#[derive(Debug, Default, Deserialize)]
pub struct TrustBody {
    text: Option<String>,
    url: Option<String>,
}

pub async fn fake_news_check(body: Option<Json<TrustBody>>) -> Response {
    let Json(body) = body.unwrap_or_default();
    match trust::check(body.text.as_deref(), body.url.as_deref()) {
        Some(verdict) => Json(json!({
            "success": true,
            "result": verdict.result,
            "confidence": verdict.confidence,
            "message": verdict.message,
        }))
        .into_response(),
        None => error_response(StatusCode::BAD_REQUEST, "No text or URL provided"),
    }
}

// --- Chatbot ---

#[derive(Debug, Default, Deserialize)]
pub struct ChatBody {
    message: Option<String>,
    context: Option<String>,
}

pub async fn chatbot_chat(State(state): State<AppState>, body: Option<Json<ChatBody>>) -> Response {
    let Json(body) = body.unwrap_or_default();
    let Some(message) = body.message.as_deref().filter(|m| !m.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "No message provided");
    };
    let reply = state.chat.reply(message, body.context.as_deref()).await;
    Json(json!({"success": true, "response": reply})).into_response()
}
