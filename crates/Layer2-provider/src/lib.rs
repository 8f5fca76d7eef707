//! # blnt-provider
//!
//! Language-model backend clients for BLNT.
//! A local Ollama server is preferred; the OpenAI API is the fallback when
//! an API key is configured.

pub mod backend;
pub mod error;
pub mod ollama;
pub mod openai;

pub use backend::LlmBackend;
pub use error::ProviderError;
pub use ollama::{ChatMessage, OllamaClient};
pub use openai::{OpenAiClient, OPENAI_API_KEY_ENV};
