// Error taxonomy for the scheduler core
//
// Queue and table misses are ordinary, recoverable outcomes: the front-end
// turns them into messages. Malformed state never leaves the store (it is
// replaced by a fresh state on load); I/O failures on save are reported but
// do not undo the in-memory change that triggered them.

use std::path::PathBuf;
use thiserror::Error;

use crate::scheduling::JobId;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Queue is empty")]
    EmptyQueue,

    #[error("Job not found: {0}")]
    KeyNotFound(JobId),

    #[error("Malformed state document: {0}")]
    MalformedState(String),

    #[error("State file I/O failed for {}: {source}", .path.display())]
    PersistenceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize state: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SchedulerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchedulerError::PersistenceIo {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_not_found_message_names_the_job() {
        let err = SchedulerError::KeyNotFound("job-42".to_string());
        assert_eq!(err.to_string(), "Job not found: job-42");
    }

    #[test]
    fn test_io_error_message_includes_path() {
        let err = SchedulerError::io(
            "/tmp/state.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/state.json"));
        assert!(msg.contains("denied"));
    }
}
