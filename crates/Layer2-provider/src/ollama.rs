//! Ollama (local) client
//!
//! Non-streaming calls against `/api/tags`, `/api/chat` and `/api/generate`.

use crate::error::ProviderError;
use blnt_foundation::ProviderSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT_SECS: u64 = 600; // Longer timeout for local models
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// One chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Client for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client; `model` is used when a call names none
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        Self::new(&settings.ollama_url, &settings.model)
    }

    /// Set custom timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ProviderError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default model
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if Ollama server is reachable
    pub async fn ping(&self) -> bool {
        self.client
            .get(self.url("/api/tags"))
            .timeout(PING_TIMEOUT)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// List available models
    pub async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        #[derive(Deserialize)]
        struct TagsResponse {
            #[serde(default)]
            models: Vec<ModelEntry>,
        }

        #[derive(Deserialize)]
        struct ModelEntry {
            name: String,
        }

        let response = self.client.get(self.url("/api/tags")).send().await?;
        let tags: TagsResponse = read_json(response).await?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Single user message chat
    pub async fn chat(&self, message: &str, model: Option<&str>) -> Result<String, ProviderError> {
        self.chat_messages(vec![ChatMessage::user(message)], model)
            .await
    }

    pub async fn chat_messages(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<&str>,
    ) -> Result<String, ProviderError> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            stream: bool,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            message: ChatMessage,
        }

        let model = model.unwrap_or(&self.model);
        debug!(model, messages = messages.len(), "Ollama chat");

        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&ChatRequest {
                model,
                messages,
                stream: false,
            })
            .send()
            .await?;
        let body: ChatResponse = read_json(response).await?;

        Ok(body.message.content)
    }

    /// Raw completion for a prompt
    pub async fn generate(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, ProviderError> {
        #[derive(Serialize)]
        struct GenerateRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            response: String,
        }

        let model = model.unwrap_or(&self.model);
        debug!(model, "Ollama generate");

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&GenerateRequest {
                model,
                prompt,
                stream: false,
            })
            .send()
            .await?;
        let body: GenerateResponse = read_json(response).await?;

        Ok(body.response)
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::from_http_status(status.as_u16(), &body));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}
