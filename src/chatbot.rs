//! News assistant backed by an OpenAI-compatible chat-completions endpoint.
//!
//! [`ChatClient::reply`] never fails: transport and upstream errors become a
//! fixed apology so the endpoint always has something to show.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::ChatConfig;

const SYSTEM_PROMPT: &str = "You are a professional news assistant. \
Always respond with accurate, clear, concise answers about news, \
without generic fallback messages. \
Do not say 'I'm still learning' or similar phrases.";

pub const EMPTY_REPLY: &str = "AI returned an empty response.";
pub const UNAVAILABLE_REPLY: &str =
    "AI chat model unavailable. Check your API key or network connection.";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat endpoint returned {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ReplyMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Build the user turn, prefixing context when there is any.
pub fn user_content(message: &str, context: Option<&str>) -> String {
    match context.filter(|c| !c.is_empty()) {
        Some(ctx) => format!("Context: {ctx}\nUser: {message}"),
        None => message.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn new(client: Client, config: ChatConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            config,
            api_key,
        }
    }

    /// Raw completion text, trimmed. Empty when the model said nothing.
    async fn complete(&self, message: &str, context: Option<&str>) -> Result<String, ChatError> {
        let content = user_content(message, context);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &content,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut req = self.client.post(url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let parsed: ChatResponse = response.json().await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default())
    }

    /// Answer `message`, falling back to a fixed line on empty or failed calls.
    #[instrument(level = "info", skip_all, fields(model = %self.config.model, has_context = context.is_some()))]
    pub async fn reply(&self, message: &str, context: Option<&str>) -> String {
        let t0 = Instant::now();
        match self.complete(message, context).await {
            Ok(text) if text.is_empty() => {
                debug!("Chat model returned no content");
                EMPTY_REPLY.to_string()
            }
            Ok(text) => {
                info!(
                    chars = text.chars().count(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Chat reply"
                );
                text
            }
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                UNAVAILABLE_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat(base_url: String) -> ChatClient {
        ChatClient::new(
            Client::new(),
            ChatConfig {
                base_url,
                ..Default::default()
            },
            Some("hf_test".to_string()),
        )
    }

    #[test]
    fn test_user_content() {
        assert_eq!(user_content("hi", None), "hi");
        assert_eq!(user_content("hi", Some("")), "hi");
        assert_eq!(user_content("hi", Some("budget")), "Context: budget\nUser: hi");
    }

    #[tokio::test]
    async fn test_reply_sends_prompt_and_trims() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_partial_json(serde_json::json!({
                "model": "deepseek-ai/DeepSeek-R1:fireworks-ai",
                "max_tokens": 500,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": "Context: elections\nUser: who won?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  The incumbent.  "}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = chat(format!("{}/v1", server.uri()))
            .reply("who won?", Some("elections"))
            .await;
        assert_eq!(reply, "The incumbent.");
    }

    #[tokio::test]
    async fn test_empty_choices_fall_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let reply = chat(server.uri()).reply("hello", None).await;
        assert_eq!(reply, EMPTY_REPLY);
    }

    #[tokio::test]
    async fn test_upstream_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let reply = chat(server.uri()).reply("hello", None).await;
        assert_eq!(reply, UNAVAILABLE_REPLY);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let reply = chat("http://127.0.0.1:9".to_string()).reply("hello", None).await;
        assert_eq!(reply, UNAVAILABLE_REPLY);
    }
}
