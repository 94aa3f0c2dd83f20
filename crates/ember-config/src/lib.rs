//! Ember Configuration System
//!
//! Provides configuration for the interactive Ember front end:
//! - Global user configuration (~/.ember/config.toml)
//! - Environment variable overrides (EMBER_*, NO_COLOR)
//! - The resolved [`ReplConfig`] handed to the REPL
//!
//! # Configuration Hierarchy
//!
//! Configuration is resolved in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config (~/.ember/config.toml)
//! 3. Environment variables (EMBER_*)
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use ember_config::ConfigLoader;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load().unwrap();
//! println!("prompt: {}", config.prompt);
//! ```

pub mod global;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use global::GlobalConfig;
pub use loader::{ConfigLoader, OutputFormat, ReplConfig};
