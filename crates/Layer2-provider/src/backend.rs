//! Backend selection
//!
//! Local first: Ollama when its server answers, otherwise OpenAI when an API
//! key is configured.

use crate::error::ProviderError;
use crate::ollama::OllamaClient;
use crate::openai::OpenAiClient;
use blnt_foundation::ProviderSettings;
use std::time::Duration;
use tracing::{debug, info};

/// The language-model backend chosen for this run
#[derive(Debug, Clone)]
pub enum LlmBackend {
    Ollama(OllamaClient),
    OpenAi(OpenAiClient),
}

impl LlmBackend {
    /// Pick a backend from settings; see [`LlmBackend::choose`]
    pub async fn select(
        settings: &ProviderSettings,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut ollama = OllamaClient::from_settings(settings)?;
        let mut openai = OpenAiClient::from_settings(settings)?;
        if let Some(timeout) = timeout {
            ollama = ollama.with_timeout(timeout)?;
            openai = openai.map(|c| c.with_timeout(timeout)).transpose()?;
        }
        Self::choose(ollama, openai).await
    }

    /// Ollama if it answers a ping, else the OpenAI client if there is one
    pub async fn choose(
        ollama: OllamaClient,
        openai: Option<OpenAiClient>,
    ) -> Result<Self, ProviderError> {
        if ollama.ping().await {
            debug!(url = ollama.base_url(), "Using Ollama");
            return Ok(Self::Ollama(ollama));
        }

        match openai {
            Some(client) => {
                info!(
                    url = client.base_url(),
                    "Ollama not reachable at {}, falling back to OpenAI",
                    ollama.base_url()
                );
                Ok(Self::OpenAi(client))
            }
            None => Err(ProviderError::NotConfigured(format!(
                "Ollama is not reachable at {} and no API key is configured. \
                 Start Ollama or set one with 'blnt config set provider.apiKey <KEY>' \
                 (or the OPENAI_API_KEY environment variable).",
                ollama.base_url()
            ))),
        }
    }

    /// Display name of the backend
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ollama(_) => "Ollama (Local)",
            Self::OpenAi(_) => "OpenAI API",
        }
    }

    /// Default model of the chosen backend
    pub fn model(&self) -> &str {
        match self {
            Self::Ollama(client) => client.model(),
            Self::OpenAi(client) => client.model(),
        }
    }

    pub async fn chat(&self, message: &str, model: Option<&str>) -> Result<String, ProviderError> {
        match self {
            Self::Ollama(client) => client.chat(message, model).await,
            Self::OpenAi(client) => client.chat(message, model).await,
        }
    }

    /// Completion for a prompt. OpenAI has no raw completion here, so the
    /// prompt goes through chat.
    pub async fn generate(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, ProviderError> {
        match self {
            Self::Ollama(client) => client.generate(prompt, model).await,
            Self::OpenAi(client) => client.chat(prompt, model).await,
        }
    }
}
