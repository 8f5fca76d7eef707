//! Task state machine

use serde_json::Value;

/// Lifecycle of a task.
///
/// The result and the error travel inside the terminal variants, so a
/// terminal task carries exactly one of them and a pending or running task
/// carries neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TaskState {
    /// Created or queued, not yet picked up
    #[default]
    Pending,

    /// Dispatched to an executor
    Running,

    /// Finished with the executor's payload
    Completed(Value),

    /// Finished with the failure message
    Failed(String),
}

impl TaskState {
    /// Check if this is a terminal state (cannot transition further)
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed(_) | TaskState::Failed(_))
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TaskState::Running)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TaskState::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskState::Completed(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            TaskState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TaskState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Status name as reported to callers
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Completed(_) => "completed",
            TaskState::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_terminal_states_carry_one_payload() {
        let done = TaskState::Completed(json!("ok"));
        assert!(done.is_terminal());
        assert_eq!(done.result(), Some(&json!("ok")));
        assert_eq!(done.error(), None);

        let failed = TaskState::Failed("boom".to_string());
        assert!(failed.is_terminal());
        assert_eq!(failed.result(), None);
        assert_eq!(failed.error(), Some("boom"));

        for state in [TaskState::Pending, TaskState::Running] {
            assert!(!state.is_terminal());
            assert!(state.result().is_none());
            assert!(state.error().is_none());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TaskState::default().to_string(), "pending");
        assert_eq!(TaskState::Failed(String::new()).to_string(), "failed");
    }
}
