//! BLNT Config - unified settings
//!
//! Global settings live in `~/.blnt/config.json`; a project may overlay them
//! with `<project>/.blnt/config.json`. Project values win key by key.

use crate::storage::JsonStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AgentConfig;

/// Settings file name
pub const BLNT_CONFIG_FILE: &str = "config.json";

// ============================================================================
// BLNT Config
// ============================================================================

/// Complete tool configuration, loaded explicitly and passed to whoever
/// needs it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlntConfig {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub desktop: DesktopConfig,

    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub provider: ProviderSettings,
}

impl BlntConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// Global settings overlaid with the current project's settings.
    /// Missing files fall back to defaults.
    pub fn load() -> Result<Self> {
        let global = JsonStore::global()?;
        let project = JsonStore::current_project()?;
        Self::load_from(&[global, project])
    }

    /// Merge the given stores in order; later stores win.
    pub fn load_from(stores: &[JsonStore]) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;

        for store in stores {
            if let Some(layer) = store.load_optional::<Value>(BLNT_CONFIG_FILE)? {
                merge_values(&mut merged, layer);
            }
        }

        let config: Self = serde_json::from_value(merged)
            .map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))?;
        config.agent.validate()?;
        Ok(config)
    }

    pub fn save_global(&self) -> Result<()> {
        self.save_to(&JsonStore::global()?)
    }

    pub fn save_project(&self) -> Result<()> {
        self.save_to(&JsonStore::current_project()?)
    }

    pub fn save_to(&self, store: &JsonStore) -> Result<()> {
        store.save(BLNT_CONFIG_FILE, self)
    }

    /// Restore every section to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ========================================================================
    // Dotted key access
    // ========================================================================

    /// Read a value by dotted key, e.g. `agent.maxConcurrentTasks`
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let root = serde_json::to_value(self)?;
        Ok(lookup(&root, key).cloned())
    }

    /// Write a value by dotted key.
    ///
    /// `raw` is parsed as JSON first (`3`, `true`, `"x"`), falling back to a
    /// plain string. The result must still deserialize into a valid config
    /// and the key must be one the config recognizes.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        if key.is_empty() || key.split('.').any(str::is_empty) {
            return Err(Error::InvalidInput(format!("Invalid key: '{}'", key)));
        }

        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));

        let mut root = serde_json::to_value(&*self)?;
        if lookup(&root, key).is_none() {
            return Err(Error::NotFound(format!("Unknown configuration key: {}", key)));
        }
        assign(&mut root, key, value);

        let updated: Self = serde_json::from_value(root)
            .map_err(|e| Error::InvalidInput(format!("Invalid value for {}: {}", key, e)))?;
        updated.agent.validate()?;

        *self = updated;
        Ok(())
    }

    // ========================================================================
    // Single-layer edits
    // ========================================================================

    /// Set one key in a single settings file, leaving the file's other keys
    /// alone. The file merged over the defaults must still be valid.
    /// Returns the stored value.
    pub fn set_in(store: &JsonStore, key: &str, raw: &str) -> Result<Value> {
        let mut candidate = Self::load_from(std::slice::from_ref(store))?;
        candidate.set(key, raw)?;
        let value = candidate.get(key)?.unwrap_or(Value::Null);

        let mut layer = store
            .load_optional::<Value>(BLNT_CONFIG_FILE)?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        assign(&mut layer, key, value.clone());
        store.save(BLNT_CONFIG_FILE, &layer)?;

        Ok(value)
    }

    /// Drop a settings file so lower layers (or defaults) apply again
    pub fn clear_in(store: &JsonStore) -> Result<()> {
        store.remove(BLNT_CONFIG_FILE)
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Page fetching used by browser tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default = "default_true")]
    pub follow_redirects: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
            follow_redirects: true,
        }
    }
}

/// OS shell used by desktop tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesktopConfig {
    /// Log stderr of successful commands
    #[serde(default)]
    pub verbose: bool,

    /// Shell override (defaults to `sh` / `cmd`)
    #[serde(default)]
    pub shell: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Language-model backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// OpenAI key for the fallback backend; `OPENAI_API_KEY` is used when unset
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_url")]
    pub openai_url: String,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            ollama_url: default_ollama_url(),
            model: default_model(),
            api_key: None,
            openai_url: default_openai_url(),
            openai_model: default_openai_model(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("blnt/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

/// Recursive object merge; non-object values in `overlay` replace.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(root, |node, part| node.get(part))
}

fn assign(root: &mut Value, key: &str, value: Value) {
    let mut node = root;
    let mut parts = key.split('.').peekable();

    while let Some(part) = parts.next() {
        if !node.is_object() {
            *node = Value::Object(serde_json::Map::new());
        }
        let Value::Object(map) = node else { return };

        if parts.peek().is_none() {
            map.insert(part.to_string(), value);
            return;
        }
        node = map
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
}
