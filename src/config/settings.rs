// Configuration structs

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::constants::{DEFAULT_HISTORY_DISPLAY_LIMIT, DEFAULT_STATE_FILE};
use crate::scheduling::DEFAULT_CAPACITY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the scheduler state document lives
    pub state_file: PathBuf,

    /// Bucket count of a brand-new job table
    pub initial_capacity: usize,

    /// History entries shown by `history` without an explicit count
    pub history_display_limit: usize,

    /// Enable debug logging for troubleshooting
    pub debug_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            initial_capacity: DEFAULT_CAPACITY,
            history_display_limit: DEFAULT_HISTORY_DISPLAY_LIMIT,
            debug_logging: false,
        }
    }
}

impl Config {
    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            bail!("initial_capacity must be at least 1");
        }
        if self.state_file.as_os_str().is_empty() {
            bail!("state_file must not be empty");
        }
        Ok(())
    }
}
