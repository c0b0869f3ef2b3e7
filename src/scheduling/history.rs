// Execution history — newest-first singly linked log

use serde::{Deserialize, Serialize};

use super::JobId;

/// One executed job. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub job_id: JobId,
    /// RFC 3339 timestamp of the execution
    pub timestamp: String,
}

struct HistoryNode {
    entry: HistoryEntry,
    next: Option<Box<HistoryNode>>,
}

/// Append-at-head log of executed jobs.
///
/// Only head-relative reads are needed ("last N"), so insertion is O(1)
/// and there is no tail pointer.
#[derive(Default)]
pub struct HistoryLog {
    head: Option<Box<HistoryNode>>,
    len: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `job_id` as the most recent execution.
    pub fn add_to_history(&mut self, job_id: JobId, timestamp: String) {
        let node = Box::new(HistoryNode {
            entry: HistoryEntry { job_id, timestamp },
            next: self.head.take(),
        });
        self.head = Some(node);
        self.len += 1;
    }

    /// The `n` most recent entries, newest first. Returns everything when
    /// `n` exceeds the log size.
    pub fn get_last_n(&self, n: usize) -> Vec<&HistoryEntry> {
        self.iter().take(n).collect()
    }

    /// All entries, newest first. Restartable: each call walks from the head.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Rebuild a log from entries listed newest first.
    pub fn from_newest_first(entries: Vec<HistoryEntry>) -> Self {
        let mut log = Self::new();
        for entry in entries.into_iter().rev() {
            log.add_to_history(entry.job_id, entry.timestamp);
        }
        log
    }
}

pub struct Iter<'a> {
    next: Option<&'a HistoryNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a HistoryEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.entry
        })
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryEntry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Unlink iteratively; the default recursive drop overflows the stack on long logs.
impl Drop for HistoryLog {
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl Clone for HistoryLog {
    fn clone(&self) -> Self {
        Self::from_newest_first(self.iter().cloned().collect())
    }
}

impl PartialEq for HistoryLog {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for HistoryLog {}

impl std::fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
