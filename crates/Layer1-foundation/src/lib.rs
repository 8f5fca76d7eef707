//! # blnt-foundation
//!
//! Foundation layer for BLNT:
//! - Error: the workspace-wide error enum and `Result` alias
//! - Config: `BlntConfig` (browser, agent, desktop, general, provider)
//! - Storage: `JsonStore` for `~/.blnt/` and `<project>/.blnt/`

pub mod config;
pub mod error;
pub mod storage;

pub use config::{
    AgentConfig, BlntConfig, BrowserConfig, DesktopConfig, GeneralConfig, ProviderSettings,
    BLNT_CONFIG_FILE,
};
pub use error::{Error, Result};
pub use storage::JsonStore;
