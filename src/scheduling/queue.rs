// FIFO work queue of job identifiers

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::JobId;
use crate::errors::{Result, SchedulerError};

/// Pending jobs in submission order.
///
/// The same id may be queued more than once; each occurrence is run
/// separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobQueue {
    items: VecDeque<JobId>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail.
    pub fn enqueue(&mut self, id: JobId) {
        self.items.push_back(id);
    }

    /// Remove and return the head.
    pub fn dequeue(&mut self) -> Result<JobId> {
        self.items.pop_front().ok_or(SchedulerError::EmptyQueue)
    }

    /// Head of the queue without removing it.
    pub fn peek(&self) -> Result<&JobId> {
        self.items.front().ok_or(SchedulerError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Items head-first.
    pub fn iter(&self) -> impl Iterator<Item = &JobId> {
        self.items.iter()
    }
}

impl FromIterator<JobId> for JobQueue {
    fn from_iter<I: IntoIterator<Item = JobId>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
