//! OpenAI-compatible chat completions adapter
//!
//! Serves OpenAI itself plus the providers exposing the same
//! `POST {base}/chat/completions` shape: a local Ollama server and
//! Gemini's OpenAI compatibility endpoint.

use super::{ProviderAdapter, ProviderKind, check_status, transport_error};
use async_trait::async_trait;
use reqwest::Client;
use roundtable_application::InvokeError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

pub struct OpenAiCompatibleAdapter {
    client: Client,
    kind: ProviderKind,
    base_url: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiCompatibleAdapter {
    /// `endpoint` overrides the provider's default base URL.
    pub fn new(
        kind: ProviderKind,
        model: impl Into<String>,
        api_key: Option<String>,
        endpoint: Option<&str>,
    ) -> Self {
        Self {
            client: Client::new(),
            kind,
            base_url: base_url(kind, endpoint),
            model: model.into(),
            api_key,
            max_tokens: 4000,
            temperature: 0.7,
        }
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f64) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Base URL for `kind`, honoring an endpoint override.
///
/// Ollama endpoints are usually configured as the bare server address, so
/// `/v1` is appended when missing.
fn base_url(kind: ProviderKind, endpoint: Option<&str>) -> String {
    let configured = endpoint
        .map(|e| e.trim().trim_end_matches('/'))
        .filter(|e| !e.is_empty());

    match (kind, configured) {
        (ProviderKind::Ollama, Some(e)) if !e.ends_with("/v1") => format!("{}/v1", e),
        (_, Some(e)) => e.to_string(),
        (ProviderKind::Ollama, None) => OLLAMA_BASE_URL.to_string(),
        (ProviderKind::Gemini, None) => GEMINI_BASE_URL.to_string(),
        (_, None) => OPENAI_BASE_URL.to_string(),
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String, InvokeError> {
        let url = self.url();
        debug!("POST {} (model {})", url, self.model);

        let mut request = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&self.request_body(prompt));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        let body: ChatResponse = response.json().await.map_err(transport_error)?;

        body.into_text()
            .ok_or_else(|| InvokeError::InvalidResponse("response has no choices".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice; a null content counts as empty text.
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
    }
}
