//! Task definition and types

use crate::state::TaskState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// TaskKind
// ============================================================================

/// What a task does; decides which executor handles it.
///
/// Names read from outside (JSON plans, CLI flags) that match no known kind
/// are kept as `Unrecognized` and rejected when the task is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    Browser,
    Desktop,
    Terminal,
    Composite,
    Unrecognized(String),
}

impl TaskKind {
    pub fn as_str(&self) -> &str {
        match self {
            TaskKind::Browser => "browser",
            TaskKind::Desktop => "desktop",
            TaskKind::Terminal => "terminal",
            TaskKind::Composite => "composite",
            TaskKind::Unrecognized(name) => name,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, TaskKind::Composite)
    }
}

impl From<&str> for TaskKind {
    fn from(s: &str) -> Self {
        match s {
            "browser" => TaskKind::Browser,
            "desktop" => TaskKind::Desktop,
            "terminal" => TaskKind::Terminal,
            "composite" => TaskKind::Composite,
            other => TaskKind::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for TaskKind {
    fn from(s: String) -> Self {
        TaskKind::from(s.as_str())
    }
}

impl From<TaskKind> for String {
    fn from(kind: TaskKind) -> Self {
        match kind {
            TaskKind::Unrecognized(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for TaskKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TaskKind::from(s))
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Task
// ============================================================================

/// A unit of work.
///
/// `id`, `description` and `kind` never change after creation. The state is
/// only moved by the agent engine. Only composite tasks have subtasks.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "TaskSpec")]
pub struct Task {
    id: String,
    description: String,
    kind: TaskKind,
    subtasks: Vec<Task>,
    state: TaskState,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task. A `Composite` kind created here has no subtasks.
    pub fn new(id: impl Into<String>, description: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            kind,
            subtasks: Vec::new(),
            state: TaskState::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Create a composite task running `subtasks` in order
    pub fn composite(
        id: impl Into<String>,
        description: impl Into<String>,
        subtasks: Vec<Task>,
    ) -> Self {
        let mut task = Self::new(id, description, TaskKind::Composite);
        task.subtasks = subtasks;
        task
    }

    /// Random `task-xxxxxxxx` identifier
    pub fn generate_id() -> String {
        format!("task-{}", &Uuid::new_v4().simple().to_string()[..8])
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn subtasks(&self) -> &[Task] {
        &self.subtasks
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn result(&self) -> Option<&Value> {
        self.state.result()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Execution duration once started
    pub fn duration(&self) -> Option<std::time::Duration> {
        let start = self.started_at?;
        let end = self.completed_at.unwrap_or_else(Utc::now);
        Some((end - start).to_std().unwrap_or_default())
    }

    pub(crate) fn subtasks_mut(&mut self) -> &mut [Task] {
        &mut self.subtasks
    }

    pub(crate) fn start(&mut self) {
        self.state = TaskState::Running;
        self.started_at = Some(Utc::now());
    }

    pub(crate) fn complete(&mut self, result: Value) {
        self.state = TaskState::Completed(result);
        self.completed_at = Some(Utc::now());
    }

    pub(crate) fn fail(&mut self, error: String) {
        self.state = TaskState::Failed(error);
        self.completed_at = Some(Utc::now());
    }

    /// Serializable snapshot of this task and its subtasks
    pub fn report(&self) -> TaskReport {
        TaskReport {
            id: self.id.clone(),
            description: self.description.clone(),
            kind: self.kind.clone(),
            status: self.state.as_str().to_string(),
            result: self.state.result().cloned(),
            error: self.state.error().map(str::to_string),
            duration_ms: self.duration().map(|d| d.as_millis() as u64),
            subtasks: self.subtasks.iter().map(Task::report).collect(),
        }
    }
}

/// On-disk shape of a task in a JSON plan
#[derive(Deserialize)]
struct TaskSpec {
    #[serde(default = "Task::generate_id")]
    id: String,
    description: String,
    #[serde(rename = "type")]
    kind: TaskKind,
    #[serde(default)]
    subtasks: Vec<Task>,
}

impl TryFrom<TaskSpec> for Task {
    type Error = String;

    fn try_from(spec: TaskSpec) -> Result<Self, Self::Error> {
        if !spec.kind.is_composite() && !spec.subtasks.is_empty() {
            return Err(format!(
                "task '{}' of type '{}' cannot have subtasks",
                spec.id, spec.kind
            ));
        }
        let mut task = Task::new(spec.id, spec.description, spec.kind);
        task.subtasks = spec.subtasks;
        Ok(task)
    }
}

// ============================================================================
// TaskReport
// ============================================================================

/// Snapshot of a task for output, events and the completed list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<TaskReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(TaskKind::from("browser"), TaskKind::Browser);
        assert_eq!("composite".parse::<TaskKind>().unwrap(), TaskKind::Composite);
        assert_eq!(
            TaskKind::from("unknown-type"),
            TaskKind::Unrecognized("unknown-type".to_string())
        );
        assert_eq!(TaskKind::from("unknown-type").to_string(), "unknown-type");
    }

    #[test]
    fn test_new_task_is_pending() {
        let task = Task::new("t1", "echo hi", TaskKind::Terminal);
        assert_eq!(task.id(), "t1");
        assert!(task.state().is_pending());
        assert!(task.subtasks().is_empty());
        assert!(task.started_at().is_none());
        assert!(task.duration().is_none());
    }

    #[test]
    fn test_transitions() {
        let mut task = Task::new("t1", "echo hi", TaskKind::Terminal);
        task.start();
        assert!(task.state().is_running());
        assert!(task.started_at().is_some());

        task.complete(json!("hi\n"));
        assert_eq!(task.result(), Some(&json!("hi\n")));
        assert!(task.error().is_none());
        assert!(task.completed_at().is_some());
        assert!(task.duration().is_some());
    }

    #[test]
    fn test_generate_id() {
        let a = Task::generate_id();
        let b = Task::generate_id();
        assert!(a.starts_with("task-"));
        assert_eq!(a.len(), "task-".len() + 8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_plan_deserialization() {
        let plan = json!([
            {"id": "a", "description": "echo a", "type": "desktop"},
            {"description": "steps", "type": "composite", "subtasks": [
                {"id": "b1", "description": "https://example.com", "type": "browser"}
            ]},
            {"id": "c", "description": "?", "type": "unknown-type"}
        ]);
        let tasks: Vec<Task> = serde_json::from_value(plan).unwrap();

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].kind(), &TaskKind::Desktop);
        assert!(tasks[1].id().starts_with("task-"));
        assert_eq!(tasks[1].subtasks().len(), 1);
        assert_eq!(tasks[1].subtasks()[0].kind(), &TaskKind::Browser);
        assert_eq!(
            tasks[2].kind(),
            &TaskKind::Unrecognized("unknown-type".to_string())
        );
    }

    #[test]
    fn test_leaf_with_subtasks_is_rejected() {
        let plan = json!({
            "id": "x", "description": "x", "type": "terminal",
            "subtasks": [{"id": "y", "description": "y", "type": "terminal"}]
        });
        let err = serde_json::from_value::<Task>(plan).unwrap_err();
        assert!(err.to_string().contains("cannot have subtasks"));
    }

    #[test]
    fn test_report() {
        let mut sub = Task::new("s1", "echo", TaskKind::Desktop);
        sub.start();
        sub.fail("boom".to_string());
        let task = Task::composite("c", "all", vec![sub]);

        let report = task.report();
        assert_eq!(report.status, "pending");
        assert_eq!(report.subtasks[0].status, "failed");
        assert_eq!(report.subtasks[0].error.as_deref(), Some("boom"));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["type"], "composite");
        assert!(value.get("result").is_none());
    }
}
