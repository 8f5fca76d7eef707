//! Executor wiring for the agent engine

use async_trait::async_trait;
use blnt_foundation::{BlntConfig, ProviderSettings, Result};
use blnt_provider::LlmBackend;
use blnt_task::{
    BrowserExecutor, CapabilityExecutor, ExecutorSet, ShellExecutor, ShellExecutorConfig,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

/// Terminal tasks: the description is sent to the language model as a prompt.
///
/// The backend is chosen on first use, so plans without terminal tasks never
/// probe for one.
pub struct QueryExecutor {
    settings: ProviderSettings,
    timeout: Duration,
    backend: OnceCell<LlmBackend>,
}

impl QueryExecutor {
    pub fn new(settings: ProviderSettings, timeout: Duration) -> Self {
        Self {
            settings,
            timeout,
            backend: OnceCell::new(),
        }
    }

    async fn backend(&self) -> Result<&LlmBackend> {
        let backend = self
            .backend
            .get_or_try_init(|| LlmBackend::select(&self.settings, Some(self.timeout)))
            .await?;
        Ok(backend)
    }
}

#[async_trait]
impl CapabilityExecutor for QueryExecutor {
    async fn execute(&self, description: &str) -> Result<Value> {
        let backend = self.backend().await?;
        debug!(backend = backend.name(), model = backend.model(), "Querying model");
        let response = backend.chat(description, None).await?;

        Ok(json!({
            "model": backend.model(),
            "response": response,
        }))
    }

    fn name(&self) -> &'static str {
        "query"
    }
}

/// Browser -> HTTP fetch, desktop -> OS shell, terminal -> LLM query
pub fn build_executors(config: &BlntConfig) -> anyhow::Result<ExecutorSet> {
    let browser = BrowserExecutor::new(&config.browser)?;

    let shell = ShellExecutor::with_config(
        ShellExecutorConfig::from_desktop(&config.desktop)
            .with_timeout(config.agent.timeout_duration()),
    );

    let query = QueryExecutor::new(config.provider.clone(), config.agent.timeout_duration());

    Ok(ExecutorSet::new(
        Arc::new(browser),
        Arc::new(shell),
        Arc::new(query),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blnt_task::TaskKind;

    #[test]
    fn test_executor_mapping() {
        let set = build_executors(&BlntConfig::default()).unwrap();
        let name = |kind: TaskKind| set.for_kind(&kind).map(|e| e.name());

        assert_eq!(name(TaskKind::Browser), Some("browser"));
        assert_eq!(name(TaskKind::Desktop), Some("shell"));
        assert_eq!(name(TaskKind::Terminal), Some("query"));
        assert_eq!(name(TaskKind::Composite), None);
    }

    #[tokio::test]
    async fn test_query_executor_uses_local_backend() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tags")
            .with_body(r#"{"models":[]}"#)
            .create_async()
            .await;
        let chat = server
            .mock("POST", "/api/chat")
            .with_body(r#"{"message":{"role":"assistant","content":"hi"},"done":true}"#)
            .expect(2)
            .create_async()
            .await;

        let settings = ProviderSettings {
            ollama_url: server.url(),
            ..ProviderSettings::default()
        };
        let executor = QueryExecutor::new(settings, Duration::from_secs(5));

        let first = executor.execute("hello").await.unwrap();
        assert_eq!(first, json!({"model": "llama3.2", "response": "hi"}));
        executor.execute("again").await.unwrap();
        chat.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_executor_without_backend() {
        // An exported key would select the remote backend
        if std::env::var(blnt_provider::OPENAI_API_KEY_ENV).is_ok() {
            return;
        }
        let settings = ProviderSettings {
            ollama_url: "http://127.0.0.1:1".to_string(),
            ..ProviderSettings::default()
        };

        let err = QueryExecutor::new(settings, Duration::from_secs(5))
            .execute("hello")
            .await
            .unwrap_err();
        assert!(matches!(err, blnt_foundation::Error::Config(_)));
    }
}
