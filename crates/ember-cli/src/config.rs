//! CLI configuration
//!
//! The file and environment layers come from `ember_config`; this module
//! applies the command-line flags on top and sets up terminal colors.

use anyhow::{Context, Result};
use ember_config::{ConfigLoader, ReplConfig};

/// Command-line flags that override the loaded configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub no_history: bool,
}

/// Load the effective configuration: defaults < ~/.ember/config.toml < EMBER_* < flags
pub fn load(flags: Flags) -> Result<ReplConfig> {
    let config = ConfigLoader::new()
        .load()
        .context("Failed to load ~/.ember/config.toml")?;
    let config = apply_flags(config, flags);

    if !config.color {
        colored::control::set_override(false);
    }
    log::debug!("configuration: {:?}", config);

    Ok(config)
}

fn apply_flags(mut config: ReplConfig, flags: Flags) -> ReplConfig {
    if flags.no_history {
        config.history = false;
    }
    config
}
