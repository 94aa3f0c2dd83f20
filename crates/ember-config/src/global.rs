//! Global Configuration (~/.ember/config.toml)
//!
//! Handles user-level configuration stored in `~/.ember/config.toml`.
//! Every field is optional; anything left out falls back to the defaults
//! in [`crate::ReplConfig`].

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.ember/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Line editor settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repl: Option<ReplSection>,

    /// How results and diagnostics are printed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSection>,
}

/// `[repl]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ReplSection {
    /// Prompt printed before each line (default: "> ")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Keep line history between sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<bool>,

    /// History file location (default: ~/.ember/history)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,

    /// Maximum number of history entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_history: Option<usize>,
}

/// `[output]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Colorize diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// "human" or "json"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(repl) = &self.repl {
            if repl.max_history == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: "repl.max_history".to_string(),
                    reason: "must be greater than 0".to_string(),
                });
            }
        }

        if let Some(format) = self.output.as_ref().and_then(|o| o.format.as_deref()) {
            validate_format_value("output.format", format)?;
        }

        Ok(())
    }

    /// Get the global config file path (~/.ember/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".ember").join("config.toml"))
    }

    /// Merge another global config into this one
    ///
    /// Other config takes precedence for non-None values
    pub fn merge(&mut self, other: &GlobalConfig) {
        if other.repl.is_some() {
            self.repl = other.repl.clone();
        }
        if other.output.is_some() {
            self.output = other.output.clone();
        }
    }
}

/// Validate output format value
pub(crate) fn validate_format_value(field: &str, value: &str) -> ConfigResult<()> {
    if !matches!(value, "human" | "json") {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be 'human' or 'json', got '{}'", value),
        });
    }
    Ok(())
}
