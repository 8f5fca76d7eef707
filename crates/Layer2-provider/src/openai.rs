//! OpenAI chat completions client
//!
//! Used when no local Ollama server answers. Non-streaming only.

use crate::error::ProviderError;
use crate::ollama::{build_client, read_json, ChatMessage};
use blnt_foundation::ProviderSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Environment variable consulted when `provider.apiKey` is unset
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Client for the OpenAI (or a compatible) chat completions API
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Build from settings, or `None` when no API key is configured.
    ///
    /// `provider.apiKey` wins over the `OPENAI_API_KEY` environment variable.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Option<Self>, ProviderError> {
        let env_key = std::env::var(OPENAI_API_KEY_ENV).ok();
        match resolve_api_key(settings, env_key) {
            Some(key) => Self::new(key, &settings.openai_url, &settings.openai_model).map(Some),
            None => Ok(None),
        }
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
        struct CompletionRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: Option<String>,
        }

        let model = model.unwrap_or(&self.model);
        debug!(model, messages = messages.len(), "OpenAI chat");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest { model, messages })
            .send()
            .await?;
        let body: CompletionResponse = read_json(response).await?;

        let choice = body.choices.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse("No choices in response".to_string())
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

fn resolve_api_key(settings: &ProviderSettings, env_key: Option<String>) -> Option<String> {
    settings
        .api_key
        .clone()
        .or(env_key)
        .filter(|key| !key.trim().is_empty())
}
