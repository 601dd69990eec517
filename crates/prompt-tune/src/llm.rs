use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatOutput {
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub output: ChatOutput,
}

impl ChatResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            output: ChatOutput {
                content: content.into(),
            },
        }
    }
}

/// Anything that can answer a single chat turn.
///
/// `history` is sent ahead of `message`; `json` asks the model for a JSON
/// formatted answer where the backend supports it.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, message: &str, history: &[ChatMessage], json: bool) -> Result<ChatResponse>;
}

#[derive(Clone)]
pub struct OllamaChat {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>, // "json" for structured output
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatMessage,
}

#[derive(Deserialize)]
struct OllamaChatMessage {
    content: String,
}

impl OllamaChat {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url,
            model,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(base_url: String, model: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            model,
            client,
        })
    }

    pub fn default() -> Self {
        Self::new(
            "http://localhost:11434".to_string(),
            "llama3".to_string(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn chat(&self, message: &str, history: &[ChatMessage], json: bool) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));

        let mut messages = history.to_vec();
        messages.push(ChatMessage::user(message));

        let request = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
            format: json.then_some("json"),
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Ollama")?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama request failed: {}", response.status());
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        Ok(ChatResponse::new(chat_response.message.content))
    }
}
