//! Task lifecycle event types

use crate::task::{Task, TaskKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskEventKind {
    #[serde(rename = "task-queued")]
    Queued,
    #[serde(rename = "task-start")]
    Started,
    #[serde(rename = "task-complete")]
    Completed,
    #[serde(rename = "task-error")]
    Failed,
}

impl TaskEventKind {
    pub const ALL: [TaskEventKind; 4] = [
        TaskEventKind::Queued,
        TaskEventKind::Started,
        TaskEventKind::Completed,
        TaskEventKind::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "task-queued",
            Self::Started => "task-start",
            Self::Completed => "task-complete",
            Self::Failed => "task-error",
        }
    }
}

impl std::fmt::Display for TaskEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle notification.
///
/// Carries a copy of the task's identity and outcome, not the task itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEvent {
    pub kind: TaskEventKind,
    pub task_id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl TaskEvent {
    fn from_task(kind: TaskEventKind, task: &Task) -> Self {
        Self {
            kind,
            task_id: task.id().to_string(),
            description: task.description().to_string(),
            task_type: task.kind().clone(),
            result: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn queued(task: &Task) -> Self {
        Self::from_task(TaskEventKind::Queued, task)
    }

    pub fn started(task: &Task) -> Self {
        Self::from_task(TaskEventKind::Started, task)
    }

    pub fn completed(task: &Task) -> Self {
        let mut event = Self::from_task(TaskEventKind::Completed, task);
        event.result = task.result().cloned();
        event
    }

    pub fn failed(task: &Task) -> Self {
        let mut event = Self::from_task(TaskEventKind::Failed, task);
        event.error = task.error().map(str::to_string);
        event
    }
}
