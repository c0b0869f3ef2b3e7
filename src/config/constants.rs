// Project-wide constants
//
// Defaults that more than one module needs. Import via
// `use crate::config::constants::*;`.

/// Directory under the home directory holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = ".taskkeeper";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// State file used when neither config, environment, nor CLI names one.
/// Relative paths resolve against the working directory.
pub const DEFAULT_STATE_FILE: &str = "app_state.json";

/// Environment variable overriding `state_file`.
pub const STATE_FILE_ENV: &str = "TASKKEEPER_STATE_FILE";

/// Number of history entries shown when no count is given.
pub const DEFAULT_HISTORY_DISPLAY_LIMIT: usize = 10;
