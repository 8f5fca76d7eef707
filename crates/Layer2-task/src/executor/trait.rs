//! Capability executor trait

use crate::task::TaskKind;
use async_trait::async_trait;
use blnt_foundation::{Error, Result};
use serde_json::Value;
use std::sync::Arc;

/// One external surface (browser, desktop shell, language model).
///
/// Receives the task description and returns an opaque payload that the
/// engine stores as the task result without looking inside.
#[async_trait]
pub trait CapabilityExecutor: Send + Sync {
    async fn execute(&self, description: &str) -> Result<Value>;

    /// Get executor name
    fn name(&self) -> &'static str;
}

/// Placeholder for a surface nobody wired up; always fails.
pub struct UnavailableExecutor {
    surface: &'static str,
}

impl UnavailableExecutor {
    pub fn new(surface: &'static str) -> Self {
        Self { surface }
    }
}

#[async_trait]
impl CapabilityExecutor for UnavailableExecutor {
    async fn execute(&self, _description: &str) -> Result<Value> {
        Err(Error::executor(format!(
            "No {} executor configured",
            self.surface
        )))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

/// One executor per leaf task kind
#[derive(Clone)]
pub struct ExecutorSet {
    browser: Arc<dyn CapabilityExecutor>,
    desktop: Arc<dyn CapabilityExecutor>,
    terminal: Arc<dyn CapabilityExecutor>,
}

impl ExecutorSet {
    pub fn new(
        browser: Arc<dyn CapabilityExecutor>,
        desktop: Arc<dyn CapabilityExecutor>,
        terminal: Arc<dyn CapabilityExecutor>,
    ) -> Self {
        Self {
            browser,
            desktop,
            terminal,
        }
    }

    pub fn with_browser(mut self, executor: Arc<dyn CapabilityExecutor>) -> Self {
        self.browser = executor;
        self
    }

    pub fn with_desktop(mut self, executor: Arc<dyn CapabilityExecutor>) -> Self {
        self.desktop = executor;
        self
    }

    pub fn with_terminal(mut self, executor: Arc<dyn CapabilityExecutor>) -> Self {
        self.terminal = executor;
        self
    }

    /// Executor for a leaf kind; `None` for composite and unrecognized kinds
    pub fn for_kind(&self, kind: &TaskKind) -> Option<&Arc<dyn CapabilityExecutor>> {
        match kind {
            TaskKind::Browser => Some(&self.browser),
            TaskKind::Desktop => Some(&self.desktop),
            TaskKind::Terminal => Some(&self.terminal),
            TaskKind::Composite | TaskKind::Unrecognized(_) => None,
        }
    }
}

impl Default for ExecutorSet {
    fn default() -> Self {
        Self::new(
            Arc::new(UnavailableExecutor::new("browser")),
            Arc::new(UnavailableExecutor::new("desktop")),
            Arc::new(UnavailableExecutor::new("terminal")),
        )
    }
}

impl std::fmt::Debug for ExecutorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorSet")
            .field("browser", &self.browser.name())
            .field("desktop", &self.desktop.name())
            .field("terminal", &self.terminal.name())
            .finish()
    }
}
