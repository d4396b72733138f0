//! Configuration resolution for cmdtree.
//!
//! Resolution order:
//! 1. Built-in defaults
//! 2. Config file (JSON), when a path is given and exists
//! 3. Environment variables (highest priority)
//!
//! The resulting [`Config`] is handed explicitly to each executor; nothing
//! here is process-wide state.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Complete cmdtree configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub messages: MessageConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// User-facing failure messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MessageConfig {
    pub prefix: String,
    pub malformed_command: String,
    pub missing_permissions: String,
    pub runtime_error: String,
    pub invalid_sender: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            prefix: " > ".to_string(),
            malformed_command: "The command is missing arguments, check the help menu".to_string(),
            missing_permissions: "You haven't enough permissions".to_string(),
            runtime_error: "Error while executing the command".to_string(),
            invalid_sender: "You aren't an allowed sender type of this command".to_string(),
        }
    }
}

/// Dispatcher behaviour switches.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Fail with a malformed command when an executable node is reached but
    /// input tokens remain that no child consumed. Off: they are ignored.
    pub reject_trailing_tokens: bool,
}

/// Completion resolver behaviour switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompletionConfig {
    /// Hide suggestions for nodes the principal cannot execute.
    pub respect_permissions: bool,
    /// Suggest root and child label words, not only parameter values.
    pub suggest_literals: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            respect_permissions: true,
            suggest_literals: true,
        }
    }
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `RUST_LOG` filter when the env-var is not set.
    pub filter: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "cmdtree=info".to_string(),
            json: false,
        }
    }
}

/// Load configuration with hierarchical resolution.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) if path.exists() => load_config_file(path)?,
        _ => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("CMDTREE_MESSAGE_PREFIX") {
        config.messages.prefix = val;
    }
    if let Some(val) = var("CMDTREE_LOG_FILTER") {
        config.logging.filter = val;
    }
    if let Some(flag) = var("CMDTREE_LOG_JSON").and_then(|val| val.parse().ok()) {
        config.logging.json = flag;
    }
    if let Some(flag) = var("CMDTREE_REJECT_TRAILING").and_then(|val| val.parse().ok()) {
        config.dispatch.reject_trailing_tokens = flag;
    }
}
