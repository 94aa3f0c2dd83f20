//! Configuration Loader
//!
//! Resolves the effective REPL configuration from defaults, the global
//! config file and the environment.

use crate::global::{validate_format_value, GlobalConfig};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Default prompt
pub const DEFAULT_PROMPT: &str = "> ";

/// Default number of history entries kept
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// How results and diagnostics are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    fn from_config(value: &str) -> ConfigResult<Self> {
        validate_format_value("output.format", value)?;
        Ok(if value == "json" {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        })
    }
}

/// Fully resolved REPL configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ReplConfig {
    pub prompt: String,
    pub history: bool,
    /// Where history is persisted; `None` when no home directory is known
    pub history_file: Option<PathBuf>,
    pub max_history: usize,
    pub color: bool,
    pub format: OutputFormat,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history: true,
            history_file: ConfigLoader::global_config_dir()
                .ok()
                .map(|dir| dir.join("history")),
            max_history: DEFAULT_MAX_HISTORY,
            color: true,
            format: OutputFormat::Human,
        }
    }
}

impl ReplConfig {
    /// Overlay the values set in a global config file
    pub fn apply_global(&mut self, global: &GlobalConfig) -> ConfigResult<()> {
        if let Some(repl) = &global.repl {
            if let Some(prompt) = &repl.prompt {
                self.prompt = prompt.clone();
            }
            if let Some(history) = repl.history {
                self.history = history;
            }
            if let Some(file) = &repl.history_file {
                self.history_file = Some(file.clone());
            }
            if let Some(max) = repl.max_history {
                self.max_history = max;
            }
        }

        if let Some(output) = &global.output {
            if let Some(color) = output.color {
                self.color = color;
            }
            if let Some(format) = &output.format {
                self.format = OutputFormat::from_config(format)?;
            }
        }

        Ok(())
    }
}

/// Configuration loader
///
/// Merges configuration sources with proper precedence:
/// 1. Built-in defaults - lowest priority
/// 2. Global config (~/.ember/config.toml) - overrides defaults
/// 3. Environment variables (EMBER_*, NO_COLOR) - overrides the file
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Create a loader that reads the given file instead of ~/.ember/config.toml
    pub fn with_global_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Resolve the REPL configuration
    ///
    /// A missing config file means defaults; a malformed one is an error.
    pub fn load(&mut self) -> ConfigResult<ReplConfig> {
        let mut config = ReplConfig::default();

        let global = self.load_global_config()?;
        config.apply_global(&global)?;

        self.apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Load global configuration, defaulting when the file does not exist
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }

    /// Apply environment variable overrides
    ///
    /// - `EMBER_PROMPT=<text>`
    /// - `EMBER_NO_HISTORY=1`
    /// - `EMBER_HISTORY_FILE=<path>`
    /// - `NO_COLOR` (any non-empty value) or `EMBER_NO_COLOR=1`
    fn apply_env_overrides(&self, config: &mut ReplConfig) {
        if let Ok(prompt) = env::var("EMBER_PROMPT") {
            config.prompt = prompt;
        }

        if env_flag("EMBER_NO_HISTORY") {
            config.history = false;
        }

        if let Ok(file) = env::var("EMBER_HISTORY_FILE") {
            if !file.is_empty() {
                config.history_file = Some(PathBuf::from(file));
            }
        }

        let no_color = env::var("NO_COLOR").is_ok_and(|v| !v.is_empty());
        if no_color || env_flag("EMBER_NO_COLOR") {
            config.color = false;
        }
    }

    /// Get the global configuration directory (~/.ember)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".ember"))
    }

    /// Ensure the parent directory of a file exists
    pub fn ensure_parent_dir(file: &Path) -> ConfigResult<()> {
        if let Some(dir) = file.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Boolean environment flag: "1", "true" or "yes"
fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
}
