// On-disk document schema
//
// {
//   "queue":      { "items": [job_id, ...] },
//   "history":    { "entries": [{ "job_id", "timestamp" }, ...] },   newest first
//   "hash_table": { "capacity": n, "entries": [{ "key", "value" }, ...] },
//   "config":     { ... },
//   "metadata":   { "saved_at", "version" }
// }
//
// `config` and `metadata` are optional on load so older or hand-written
// files still open; the other three sections are required.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, SchedulerError};
use crate::scheduling::{HistoryEntry, HistoryLog, JobId, JobQueue, JobTable, SchedulerState};

/// Version tag written into every saved document.
pub const STATE_VERSION: u32 = 1;

/// Largest saved bucket count accepted regardless of how many entries the
/// document holds. Larger tables are accepted only when their entry count
/// needs them.
pub const MAX_RESTORED_CAPACITY: usize = 1 << 20;

fn capacity_limit(entries: usize) -> usize {
    entries
        .saturating_mul(2)
        .checked_next_power_of_two()
        .unwrap_or(usize::MAX)
        .max(MAX_RESTORED_CAPACITY)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDocument {
    pub queue: QueueSection,
    pub history: HistorySection,
    pub hash_table: HashTableSection,
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSection {
    pub items: Vec<JobId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySection {
    /// Newest first
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashTableSection {
    pub capacity: usize,
    pub entries: Vec<TableEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEntry {
    pub key: JobId,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub saved_at: String,
    pub version: u32,
}

impl StateDocument {
    /// Snapshot `state` for writing, stamped with `saved_at`.
    pub fn capture(state: &SchedulerState, saved_at: String) -> Self {
        Self {
            queue: QueueSection {
                items: state.queue.iter().cloned().collect(),
            },
            history: HistorySection {
                entries: state.history.iter().cloned().collect(),
            },
            hash_table: HashTableSection {
                capacity: state.table.capacity(),
                entries: state
                    .table
                    .entries()
                    .map(|r| TableEntry {
                        key: r.key.clone(),
                        value: r.value.clone(),
                    })
                    .collect(),
            },
            config: state.config.clone(),
            metadata: Some(Metadata {
                saved_at,
                version: STATE_VERSION,
            }),
        }
    }

    /// Parse a document from JSON text. Any shape mismatch is `MalformedState`.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| SchedulerError::MalformedState(e.to_string()))
    }

    /// Rebuild the in-memory state.
    ///
    /// The table is recreated at the saved capacity and every pair goes back
    /// through `insert`, so bucket placement is recomputed rather than
    /// trusted from the file.
    pub fn into_state(self) -> Result<SchedulerState> {
        if let Some(meta) = &self.metadata {
            if meta.version > STATE_VERSION {
                return Err(SchedulerError::MalformedState(format!(
                    "unsupported state version {} (this build writes {})",
                    meta.version, STATE_VERSION
                )));
            }
        }
        if self.hash_table.capacity == 0 {
            return Err(SchedulerError::MalformedState(
                "hash_table.capacity must be at least 1".to_string(),
            ));
        }
        let limit = capacity_limit(self.hash_table.entries.len());
        if self.hash_table.capacity > limit {
            return Err(SchedulerError::MalformedState(format!(
                "hash_table.capacity {} exceeds the limit of {} for {} entries",
                self.hash_table.capacity,
                limit,
                self.hash_table.entries.len()
            )));
        }

        let mut table = JobTable::with_capacity(self.hash_table.capacity);
        for entry in self.hash_table.entries {
            table.insert(entry.key, entry.value);
        }

        Ok(SchedulerState {
            queue: self.queue.items.into_iter().collect::<JobQueue>(),
            history: HistoryLog::from_newest_first(self.history.entries),
            table,
            config: self.config,
        })
    }
}
