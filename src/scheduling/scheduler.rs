// Task scheduler — the only code that mutates scheduler state
//
// Every mutating operation persists the full state before returning. A failed
// save is logged and remembered, but the in-memory change stands: the process
// keeps running with unsaved changes rather than undoing work that already
// happened.

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::job::{mark_executed, now_timestamp, submitted_metadata, JobId};
use super::{HistoryEntry, SchedulerState};
use crate::errors::{Result, SchedulerError};
use crate::persistence::{LoadedState, StateOrigin, StateStore};

/// Point-in-time counters for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerStats {
    pub queued: usize,
    pub executed: usize,
    pub tracked_jobs: usize,
    pub table_capacity: usize,
    pub load_factor: f64,
}

pub struct TaskScheduler {
    state: SchedulerState,
    store: Option<StateStore>,
    last_save_error: Option<SchedulerError>,
}

impl TaskScheduler {
    /// Load state from `store` and persist every subsequent change to it.
    /// Returns where the initial state came from alongside the scheduler.
    pub fn open(store: StateStore) -> (Self, StateOrigin) {
        let LoadedState { state, origin } = store.load();
        let scheduler = Self {
            state,
            store: Some(store),
            last_save_error: None,
        };
        (scheduler, origin)
    }

    /// Scheduler over `state` with no persistence.
    pub fn in_memory(state: SchedulerState) -> Self {
        Self {
            state,
            store: None,
            last_save_error: None,
        }
    }

    // ── mutating operations ───────────────────────────────────────────────────

    /// Queue `job_id` and record it as queued, overwriting any earlier record.
    pub fn submit_task(&mut self, job_id: impl Into<JobId>) {
        let job_id = job_id.into();
        let metadata = submitted_metadata(&job_id, &now_timestamp());

        self.state.queue.enqueue(job_id.clone());
        self.state.table.insert(job_id.clone(), metadata);
        info!(job_id = %job_id, queued = self.state.queue.size(), "Submitted task");

        self.persist();
    }

    /// Run the job at the head of the queue.
    pub fn run_next_task(&mut self) -> Result<JobId> {
        let job_id = self.execute_next()?;
        self.persist();
        Ok(job_id)
    }

    /// Run every queued job in order, saving once at the end. Returns the
    /// executed ids in execution order.
    pub fn run_all(&mut self) -> Vec<JobId> {
        let mut executed = Vec::with_capacity(self.state.queue.size());
        while let Ok(job_id) = self.execute_next() {
            executed.push(job_id);
        }

        if !executed.is_empty() {
            info!(count = executed.len(), "Ran all queued tasks");
            self.persist();
        }
        executed
    }

    /// Drop a job's record from the table.
    ///
    /// The queue and history are left alone: a still-queued copy will run
    /// later, and past executions stay in the history, both with no record.
    pub fn remove_job(&mut self, job_id: &str) -> Result<Value> {
        let removed = self.state.table.remove(job_id)?;
        info!(job_id = %job_id, "Removed job record");
        self.persist();
        Ok(removed)
    }

    /// Set a key in the free-form persisted config.
    pub fn set_config(&mut self, key: impl Into<String>, value: Value) {
        self.state.config.insert(key.into(), value);
        self.persist();
    }

    fn execute_next(&mut self) -> Result<JobId> {
        let job_id = self.state.queue.dequeue()?;
        let executed_at = now_timestamp();

        self.state
            .history
            .add_to_history(job_id.clone(), executed_at.clone());
        if let Ok(metadata) = self.state.table.search_mut(&job_id) {
            mark_executed(metadata, &executed_at);
        }

        info!(job_id = %job_id, "Executed task");
        Ok(job_id)
    }

    fn persist(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        match store.save(&self.state) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                warn!("Changes kept in memory but not saved: {}", e);
                self.last_save_error = Some(e);
            }
        }
    }

    // ── queries ───────────────────────────────────────────────────────────────

    pub fn find_job(&self, job_id: &str) -> Result<&Value> {
        self.state.table.search(job_id)
    }

    /// The `n` most recent executions, newest first.
    pub fn get_last_n_tasks(&self, n: usize) -> Vec<&HistoryEntry> {
        self.state.history.get_last_n(n)
    }

    /// Full history, newest first.
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.state.history.iter()
    }

    /// Pending jobs, next to run first.
    pub fn queued_jobs(&self) -> impl Iterator<Item = &JobId> {
        self.state.queue.iter()
    }

    pub fn peek_next(&self) -> Result<&JobId> {
        self.state.queue.peek()
    }

    pub fn job_ids(&self) -> impl Iterator<Item = &JobId> {
        self.state.table.get_all_keys()
    }

    pub fn queue_size(&self) -> usize {
        self.state.queue.size()
    }

    pub fn history_size(&self) -> usize {
        self.state.history.size()
    }

    pub fn config(&self) -> &Map<String, Value> {
        &self.state.config
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            queued: self.state.queue.size(),
            executed: self.state.history.size(),
            tracked_jobs: self.state.table.len(),
            table_capacity: self.state.table.capacity(),
            load_factor: self.state.table.load_factor(),
        }
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn store(&self) -> Option<&StateStore> {
        self.store.as_ref()
    }

    /// Error from the most recent save, if it failed.
    pub fn last_save_error(&self) -> Option<&SchedulerError> {
        self.last_save_error.as_ref()
    }
}
