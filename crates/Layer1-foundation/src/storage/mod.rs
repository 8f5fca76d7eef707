//! Storage module for BLNT
//!
//! - `json`: plain JSON files under `~/.blnt/` or `<project>/.blnt/`

mod json;

pub use json::JsonStore;
