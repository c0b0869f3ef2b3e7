// File-backed state store
//
// One JSON document per store, overwritten wholesale on every save. Writes go
// to a sibling temp file that is then renamed over the target, so a crash
// mid-write leaves the previous document in place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::document::StateDocument;
use crate::errors::{Result, SchedulerError};
use crate::scheduling::{now_timestamp, SchedulerState};

/// Why a fresh state was used instead of the saved one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreshReason {
    /// No state file exists yet
    Missing,
    /// The file exists but does not hold a valid state document
    Malformed(String),
    /// The file exists but could not be read
    Unreadable(String),
}

/// Where the state returned by [`StateStore::load`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateOrigin {
    Loaded,
    Fresh(FreshReason),
}

impl StateOrigin {
    pub fn is_loaded(&self) -> bool {
        matches!(self, StateOrigin::Loaded)
    }
}

#[derive(Debug)]
pub struct LoadedState {
    pub state: SchedulerState,
    pub origin: StateOrigin,
}

/// Reads and writes the scheduler state document at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    /// Job table capacity used when a fresh state has to be created
    initial_capacity: usize,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>, initial_capacity: usize) -> Self {
        Self {
            path: path.into(),
            initial_capacity: initial_capacity.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved state, falling back to an empty one when the file is
    /// absent, unreadable, or malformed. Never fails.
    pub fn load(&self) -> LoadedState {
        match self.try_load() {
            Ok(state) => {
                info!(
                    path = %self.path.display(),
                    queued = state.queue.size(),
                    executed = state.history.size(),
                    jobs = state.table.len(),
                    "Loaded scheduler state"
                );
                LoadedState {
                    state,
                    origin: StateOrigin::Loaded,
                }
            }
            Err(reason) => {
                match &reason {
                    FreshReason::Missing => {
                        debug!(path = %self.path.display(), "No state file, starting fresh")
                    }
                    FreshReason::Malformed(msg) | FreshReason::Unreadable(msg) => {
                        warn!(path = %self.path.display(), "Ignoring saved state: {}", msg)
                    }
                }
                LoadedState {
                    state: SchedulerState::empty(self.initial_capacity),
                    origin: StateOrigin::Fresh(reason),
                }
            }
        }
    }

    fn try_load(&self) -> std::result::Result<SchedulerState, FreshReason> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(FreshReason::Missing),
            Err(e) => {
                return Err(FreshReason::Unreadable(
                    SchedulerError::io(&self.path, e).to_string(),
                ))
            }
        };

        StateDocument::parse(&raw)
            .and_then(StateDocument::into_state)
            .map_err(|e| FreshReason::Malformed(e.to_string()))
    }

    /// Write the full state, stamped with the current time and version.
    pub fn save(&self, state: &SchedulerState) -> Result<()> {
        let document = StateDocument::capture(state, now_timestamp());
        let json = serde_json::to_string_pretty(&document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SchedulerError::io(parent, e))?;
        }

        let tmp_path = self.temp_path();
        fs::write(&tmp_path, json).map_err(|e| SchedulerError::io(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(SchedulerError::io(&self.path, e));
        }

        debug!(path = %self.path.display(), "Saved scheduler state");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
