// Configuration loader
// Loads settings from ~/.taskkeeper/config.toml (or an explicit path), then
// applies the environment override

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, STATE_FILE_ENV};
use super::settings::Config;

/// Load configuration.
///
/// An explicit path must exist. Without one, `~/.taskkeeper/config.toml` is
/// read when present and defaults are used otherwise.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config> {
    let mut config = match explicit_path {
        Some(path) => read_config_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_config_file(&path)?,
            _ => Config::default(),
        },
    };

    apply_env_override(&mut config, std::env::var(STATE_FILE_ENV).ok());

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// `~/.taskkeeper/config.toml`, if the home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn read_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))
}

fn parse_config(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

fn apply_env_override(config: &mut Config, state_file: Option<String>) {
    if let Some(state_file) = state_file.filter(|s| !s.trim().is_empty()) {
        config.state_file = PathBuf::from(state_file);
    }
}
