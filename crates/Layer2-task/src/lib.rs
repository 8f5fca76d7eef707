//! # blnt-task
//!
//! Task model and execution engine for BLNT.
//! Tasks are queued, drained in order and dispatched by kind to an
//! executor; composite tasks run their subtasks depth-first.
//!
//! ## Features
//!
//! - FIFO task queue with sequential or bounded-concurrency draining
//! - Browser, shell and pluggable executors behind one trait
//! - Fail-fast composite tasks
//! - **Lifecycle events (queued, start, complete, error)**

pub mod engine;
pub mod event;
pub mod executor;
pub mod queue;
pub mod state;
pub mod task;

pub use engine::{AgentEngine, AgentStatus};
pub use event::{
    CallbackListener, ListenerId, TaskEvent, TaskEventBus, TaskEventBusConfig, TaskEventKind,
    TaskEventListener,
};
pub use executor::{
    BrowserExecutor, CapabilityExecutor, ExecutorSet, ShellExecutor, ShellExecutorConfig,
    UnavailableExecutor,
};
pub use queue::TaskQueue;
pub use state::TaskState;
pub use task::{Task, TaskKind, TaskReport};
