//! Agent Engine - queues, dispatches and tracks tasks
//!
//! Features:
//! - FIFO admission with a sequential drain loop
//! - Optional bounded-concurrency drain
//! - Composite tasks run their subtasks in order and stop at the first failure
//! - Lifecycle events through an engine-owned `TaskEventBus`
//!
//! Queue, running-set and completed list are only touched here; callers
//! observe them through `get_status` and `completed`. The running-set holds
//! top-level dispatches only: subtasks of a composite run inside their
//! parent's entry.

use crate::event::{TaskEvent, TaskEventBus};
use crate::executor::ExecutorSet;
use crate::queue::TaskQueue;
use crate::task::{Task, TaskKind, TaskReport};
use blnt_foundation::{AgentConfig, Error, Result};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// Snapshot of queue sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub queued: usize,
    pub running: usize,
    pub completed: usize,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "queued: {}, running: {}, completed: {}",
            self.queued, self.running, self.completed
        )
    }
}

/// Entry in the running-set. Ids are not unique, so this is a list.
#[derive(Debug, Clone)]
struct RunningTask {
    id: String,
    started_at: DateTime<Utc>,
}

/// Agent Engine
pub struct AgentEngine {
    config: AgentConfig,
    executors: ExecutorSet,
    queue: Mutex<TaskQueue>,
    running: RwLock<Vec<RunningTask>>,
    completed: RwLock<Vec<TaskReport>>,
    events: TaskEventBus,
}

impl AgentEngine {
    /// Create an engine; rejects out-of-range configuration
    pub fn new(config: AgentConfig, executors: ExecutorSet) -> Result<Self> {
        config.validate()?;

        debug!(
            max_concurrent_tasks = config.max_concurrent_tasks,
            timeout_ms = config.timeout,
            retry_attempts = config.retry_attempts,
            "Creating agent engine"
        );

        Ok(Self {
            config,
            executors,
            queue: Mutex::new(TaskQueue::new()),
            running: RwLock::new(Vec::new()),
            completed: RwLock::new(Vec::new()),
            events: TaskEventBus::new(),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Lifecycle event bus
    pub fn events(&self) -> &TaskEventBus {
        &self.events
    }

    // ========== Submission ==========

    /// Admit a task to the queue and emit `task-queued`
    pub async fn add_task(&self, task: Task) {
        let event = TaskEvent::queued(&task);
        debug!(task_id = %task.id(), "Task queued");

        self.queue.lock().await.enqueue(task);
        self.events.publish(event).await;
    }

    /// Run one task to a terminal state.
    ///
    /// On return the task is completed with a result or failed with an
    /// error; failures are also returned to the caller.
    pub async fn execute_task(&self, task: &mut Task) -> Result<Value> {
        self.execute_boxed(task, true).await
    }

    // Boxed so composite tasks can recurse
    fn execute_boxed<'a>(
        &'a self,
        task: &'a mut Task,
        top_level: bool,
    ) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            task.start();
            if top_level {
                self.running.write().await.push(RunningTask {
                    id: task.id().to_string(),
                    started_at: Utc::now(),
                });
            }
            self.events.publish(TaskEvent::started(task)).await;
            debug!(task_id = %task.id(), kind = %task.kind(), "Executing: {}", task.description());

            let outcome = self.dispatch(task).await;
            if top_level {
                self.release_running(task.id()).await;
            }

            match outcome {
                Ok(result) => {
                    task.complete(result.clone());
                    self.completed.write().await.push(task.report());
                    info!(task_id = %task.id(), "Completed: {}", task.description());
                    self.events.publish(TaskEvent::completed(task)).await;
                    Ok(result)
                }
                Err(e) => {
                    task.fail(e.to_string());
                    debug!(task_id = %task.id(), error = %e, "Failed: {}", task.description());
                    self.events.publish(TaskEvent::failed(task)).await;
                    Err(e)
                }
            }
        })
    }

    async fn dispatch(&self, task: &mut Task) -> Result<Value> {
        let kind = task.kind().clone();

        match kind {
            TaskKind::Browser | TaskKind::Desktop | TaskKind::Terminal => {
                let executor = self
                    .executors
                    .for_kind(&kind)
                    .ok_or_else(|| Error::Task(format!("No executor for {}", kind)))?;
                executor.execute(task.description()).await
            }
            TaskKind::Composite => {
                let mut results = Vec::with_capacity(task.subtasks().len());
                for subtask in task.subtasks_mut() {
                    // First failure ends the composite; later subtasks stay pending
                    results.push(self.execute_boxed(subtask, false).await?);
                }
                Ok(json!({ "type": "composite", "results": results }))
            }
            TaskKind::Unrecognized(name) => Err(Error::UnrecognizedTaskType(name)),
        }
    }

    async fn release_running(&self, id: &str) {
        let mut running = self.running.write().await;
        if let Some(pos) = running.iter().position(|r| r.id == id) {
            let entry = running.remove(pos);
            let elapsed = Utc::now() - entry.started_at;
            debug!(task_id = %id, elapsed_ms = elapsed.num_milliseconds(), "Released");
        }
    }

    // ========== Drain loops ==========

    /// Drain the queue one task at a time, in FIFO order.
    ///
    /// A failing task is logged and the drain moves on. Returns the
    /// processed tasks in execution order.
    pub async fn process_tasks(&self) -> Vec<Task> {
        let mut processed = Vec::new();

        while let Some(task) = self.dequeue().await {
            processed.push(self.run_isolated(task).await);
        }

        info!("All tasks processed ({})", processed.len());
        processed
    }

    /// Drain the queue with up to `max_concurrent_tasks` top-level tasks in
    /// flight.
    ///
    /// Start order follows the queue but completion order does not; the
    /// returned tasks are in completion order. Subtasks of a composite run
    /// inside their parent's slot, so the running-set never holds more than
    /// `max_concurrent_tasks` entries.
    pub async fn process_tasks_concurrent(&self) -> Vec<Task> {
        let limit = self.config.max_concurrent_tasks;
        let mut in_flight = FuturesUnordered::new();
        let mut processed = Vec::new();

        loop {
            while in_flight.len() < limit {
                match self.dequeue().await {
                    Some(task) => in_flight.push(self.run_isolated(task)),
                    None => break,
                }
            }

            match in_flight.next().await {
                Some(task) => processed.push(task),
                None => break,
            }
        }

        info!("All tasks processed ({})", processed.len());
        processed
    }

    async fn dequeue(&self) -> Option<Task> {
        self.queue.lock().await.dequeue_next()
    }

    async fn run_isolated(&self, mut task: Task) -> Task {
        if let Err(e) = self.execute_task(&mut task).await {
            if self.config.verbose {
                error!(
                    task_id = %task.id(),
                    kind = %task.kind(),
                    description = %task.description(),
                    "Task failed: {:?}", e
                );
            } else {
                warn!(task_id = %task.id(), "Task failed: {}", e);
            }
        }
        task
    }

    // ========== Status ==========

    /// Current queue sizes; no side effects
    pub async fn get_status(&self) -> AgentStatus {
        let queued = self.queue.lock().await.len();
        let running = self.running.read().await.len();
        let completed = self.completed.read().await.len();

        AgentStatus {
            queued,
            running,
            completed,
        }
    }

    /// Copy of the completed list, oldest first
    pub async fn completed(&self) -> Vec<TaskReport> {
        self.completed.read().await.clone()
    }

    /// Ids of the top-level tasks currently in the running-set
    pub async fn running_ids(&self) -> Vec<String> {
        self.running.read().await.iter().map(|r| r.id.clone()).collect()
    }

    /// Empty the completed list. Queued and running tasks are untouched.
    pub async fn clear_completed(&self) {
        self.completed.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CapabilityExecutor;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl CapabilityExecutor for Echo {
        async fn execute(&self, description: &str) -> Result<Value> {
            Ok(json!(description))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    fn engine() -> AgentEngine {
        let echo: Arc<dyn CapabilityExecutor> = Arc::new(Echo);
        AgentEngine::new(
            AgentConfig::default(),
            ExecutorSet::new(echo.clone(), echo.clone(), echo),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = AgentEngine::new(
            AgentConfig::default().max_concurrent_tasks(0),
            ExecutorSet::default(),
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_engine_creation() {
        let engine = engine();
        assert_eq!(engine.get_status().await, AgentStatus::default());
        assert!(engine.running_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_task_counts_as_queued() {
        let engine = engine();
        engine
            .add_task(Task::new("t1", "a", TaskKind::Terminal))
            .await;
        assert_eq!(engine.get_status().await.queued, 1);
    }

    #[tokio::test]
    async fn test_execute_leaf() {
        let engine = engine();
        let mut task = Task::new("t1", "hello", TaskKind::Desktop);

        let result = engine.execute_task(&mut task).await.unwrap();
        assert_eq!(result, json!("hello"));
        assert_eq!(task.result(), Some(&json!("hello")));
        assert_eq!(engine.get_status().await.completed, 1);
        assert!(engine.running_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_composite_completes() {
        let engine = engine();
        let mut task = Task::composite("c", "nothing", vec![]);

        let result = engine.execute_task(&mut task).await.unwrap();
        assert_eq!(result, json!({"type": "composite", "results": []}));
        assert!(task.state().is_success());
    }

    #[tokio::test]
    async fn test_duplicate_ids_release_cleanly() {
        let engine = engine();
        let mut task = Task::composite(
            "dup",
            "parent",
            vec![Task::new("dup", "child", TaskKind::Terminal)],
        );

        engine.execute_task(&mut task).await.unwrap();
        assert_eq!(engine.get_status().await.running, 0);
        assert_eq!(engine.get_status().await.completed, 2);
    }

    struct RunningWatch {
        engine: std::sync::Mutex<Option<Arc<AgentEngine>>>,
        seen: std::sync::Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl crate::event::TaskEventListener for RunningWatch {
        fn name(&self) -> &str {
            "running-watch"
        }

        async fn on_event(&self, _event: &TaskEvent) {
            let engine = self.engine.lock().unwrap().clone();
            if let Some(engine) = engine {
                let ids = engine.running_ids().await;
                self.seen.lock().unwrap().push(ids);
            }
        }
    }

    #[tokio::test]
    async fn test_subtasks_share_parent_running_entry() {
        let engine = Arc::new(engine());
        let watch = Arc::new(RunningWatch {
            engine: std::sync::Mutex::new(Some(engine.clone())),
            seen: std::sync::Mutex::new(Vec::new()),
        });
        engine.events().subscribe(watch.clone()).await;

        let mut task = Task::composite(
            "parent",
            "outer",
            vec![Task::composite(
                "middle",
                "inner",
                vec![Task::new("leaf", "x", TaskKind::Desktop)],
            )],
        );
        engine.execute_task(&mut task).await.unwrap();
        watch.engine.lock().unwrap().take();

        let seen = watch.seen.lock().unwrap();
        // started: parent, middle, leaf; completed: leaf, middle, parent
        assert_eq!(seen.len(), 6);
        for ids in &seen[..5] {
            assert_eq!(ids, &vec!["parent".to_string()]);
        }
        assert!(seen[5].is_empty());
    }

    #[tokio::test]
    async fn test_status_display() {
        let status = AgentStatus {
            queued: 1,
            running: 2,
            completed: 3,
        };
        assert_eq!(status.to_string(), "queued: 1, running: 2, completed: 3");
    }
}
