//! Capability executors
//!
//! The engine only sees the `CapabilityExecutor` trait. Provided backends:
//! - `ShellExecutor` - OS shell commands (desktop tasks)
//! - `BrowserExecutor` - HTTP page fetch (browser tasks)
//!
//! The language-model executor for terminal tasks lives with the CLI, which
//! owns the provider client.

pub mod browser;
pub mod shell;
pub mod r#trait;

pub use browser::BrowserExecutor;
pub use r#trait::{CapabilityExecutor, ExecutorSet, UnavailableExecutor};
pub use shell::{ShellExecutor, ShellExecutorConfig};
