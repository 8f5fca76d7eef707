//! Config - unified settings
//!
//! - `agent.rs` - agent engine options
//! - `blnt.rs` - BlntConfig with global/project layering

mod agent;
mod blnt;

pub use agent::AgentConfig;
pub use blnt::{
    BlntConfig, BrowserConfig, DesktopConfig, GeneralConfig, ProviderSettings, BLNT_CONFIG_FILE,
};
