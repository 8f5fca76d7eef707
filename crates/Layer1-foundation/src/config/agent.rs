//! Agent engine options

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options record supplied once when an agent engine is constructed.
///
/// `timeout` and `retry_attempts` are accepted and validated but the engine
/// does not consult them; a timeout is applied by executors that choose to
/// honor it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Upper bound on top-level tasks in flight for the concurrent drain
    #[serde(default = "default_max_concurrent_tasks")]
    pub max_concurrent_tasks: usize,

    /// Task timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Retry attempts (currently unused)
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Print failure details during a drain
    #[serde(default)]
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: default_max_concurrent_tasks(),
            timeout: default_timeout(),
            retry_attempts: default_retry_attempts(),
            verbose: false,
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_concurrent_tasks(mut self, max: usize) -> Self {
        self.max_concurrent_tasks = max;
        self
    }

    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Reject values outside the recognized ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_tasks == 0 {
            return Err(Error::Validation(
                "agent.maxConcurrentTasks must be greater than 0".to_string(),
            ));
        }
        if self.timeout == 0 {
            return Err(Error::Validation(
                "agent.timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_max_concurrent_tasks() -> usize {
    3
}

fn default_timeout() -> u64 {
    60_000
}

fn default_retry_attempts() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.max_concurrent_tasks, 3);
        assert_eq!(config.timeout, 60_000);
        assert_eq!(config.retry_attempts, 2);
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(AgentConfig::new().max_concurrent_tasks(0).validate().is_err());
        assert!(AgentConfig::new().timeout_ms(0).validate().is_err());
        // zero retries is allowed
        assert!(AgentConfig::new().retry_attempts(0).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{"verbose": true}"#).unwrap();
        assert!(config.verbose);
        assert_eq!(config.max_concurrent_tasks, 3);

        let config: AgentConfig =
            serde_json::from_str(r#"{"maxConcurrentTasks": 8, "timeout": 500}"#).unwrap();
        assert_eq!(config.max_concurrent_tasks, 8);
        assert_eq!(config.timeout_duration(), Duration::from_millis(500));
    }
}
