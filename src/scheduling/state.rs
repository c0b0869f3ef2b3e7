// The persisted unit: queue, history, job table, and free-form config

use serde_json::{Map, Value};

use super::{HistoryLog, JobQueue, JobTable};

/// Full scheduler state. Always saved and loaded as one document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchedulerState {
    pub queue: JobQueue,
    pub history: HistoryLog,
    pub table: JobTable,
    /// User-owned settings carried through load/save untouched.
    pub config: Map<String, Value>,
}

impl SchedulerState {
    /// Empty state whose job table starts at `capacity` buckets.
    pub fn empty(capacity: usize) -> Self {
        Self {
            table: JobTable::with_capacity(capacity),
            ..Self::default()
        }
    }
}
