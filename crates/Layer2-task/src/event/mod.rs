//! Task lifecycle events
//!
//! ```ignore
//! let engine = AgentEngine::new(config, executors)?;
//!
//! engine
//!     .events()
//!     .on(vec![TaskEventKind::Failed], |e| eprintln!("{} failed", e.task_id))
//!     .await;
//! ```

pub mod bus;
pub mod types;

pub use bus::{CallbackListener, ListenerId, TaskEventBus, TaskEventBusConfig, TaskEventListener};
pub use types::{TaskEvent, TaskEventKind};
