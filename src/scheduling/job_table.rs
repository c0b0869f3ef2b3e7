// Job table — string-keyed hash map with separate chaining
//
// Bucket index is a base-31 polynomial hash of the key's UTF-8 bytes modulo
// the capacity. The hash is independent of process state, so a table rebuilt
// from a saved document places every record in the same bucket.

use serde_json::Value;
use tracing::debug;

use super::JobId;
use crate::errors::{Result, SchedulerError};

/// Capacity a new table starts with unless told otherwise.
pub const DEFAULT_CAPACITY: usize = 16;

/// Resize once `count / capacity` exceeds this.
pub const MAX_LOAD_FACTOR: f64 = 0.75;

const HASH_BASE: u64 = 31;

/// A job id and its free-form metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub key: JobId,
    pub value: Value,
}

/// Hash table from job id to metadata.
///
/// Growth is one-directional: capacity doubles when the load factor passes
/// [`MAX_LOAD_FACTOR`] and never shrinks on removal.
#[derive(Debug, Clone)]
pub struct JobTable {
    buckets: Vec<Vec<JobRecord>>,
    count: usize,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Empty table with `capacity` buckets. A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); capacity.max(1)],
            count: 0,
        }
    }

    fn hash(key: &str) -> u64 {
        key.bytes().fold(0u64, |acc, b| {
            acc.wrapping_mul(HASH_BASE).wrapping_add(u64::from(b))
        })
    }

    fn bucket_index(key: &str, capacity: usize) -> usize {
        (Self::hash(key) % capacity as u64) as usize
    }

    /// Insert or overwrite. A new key is appended to its bucket's chain and
    /// may trigger a resize.
    pub fn insert(&mut self, key: JobId, value: Value) {
        let index = Self::bucket_index(&key, self.capacity());
        let chain = &mut self.buckets[index];

        if let Some(record) = chain.iter_mut().find(|r| r.key == key) {
            record.value = value;
            return;
        }

        chain.push(JobRecord { key, value });
        self.count += 1;

        if self.load_factor() > MAX_LOAD_FACTOR {
            self.resize(self.capacity() * 2);
        }
    }

    /// Full rehash into `new_capacity` buckets.
    fn resize(&mut self, new_capacity: usize) {
        debug!(
            from = self.capacity(),
            to = new_capacity,
            records = self.count,
            "Resizing job table"
        );

        let old = std::mem::replace(&mut self.buckets, vec![Vec::new(); new_capacity]);
        for record in old.into_iter().flatten() {
            let index = Self::bucket_index(&record.key, new_capacity);
            self.buckets[index].push(record);
        }
    }

    pub fn search(&self, key: &str) -> Result<&Value> {
        self.chain(key)
            .iter()
            .find(|r| r.key == key)
            .map(|r| &r.value)
            .ok_or_else(|| SchedulerError::KeyNotFound(key.to_string()))
    }

    pub fn search_mut(&mut self, key: &str) -> Result<&mut Value> {
        let index = Self::bucket_index(key, self.capacity());
        self.buckets[index]
            .iter_mut()
            .find(|r| r.key == key)
            .map(|r| &mut r.value)
            .ok_or_else(|| SchedulerError::KeyNotFound(key.to_string()))
    }

    /// Remove a record and return its value. Capacity is left unchanged.
    pub fn remove(&mut self, key: &str) -> Result<Value> {
        let index = Self::bucket_index(key, self.capacity());
        let chain = &mut self.buckets[index];
        let position = chain
            .iter()
            .position(|r| r.key == key)
            .ok_or_else(|| SchedulerError::KeyNotFound(key.to_string()))?;

        self.count -= 1;
        Ok(chain.remove(position).value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.chain(key).iter().any(|r| r.key == key)
    }

    /// Keys in bucket-then-chain order. Order changes across resizes.
    pub fn get_all_keys(&self) -> impl Iterator<Item = &JobId> {
        self.entries().map(|r| &r.key)
    }

    /// Records in bucket-then-chain order.
    pub fn entries(&self) -> impl Iterator<Item = &JobRecord> {
        self.buckets.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    fn chain(&self, key: &str) -> &[JobRecord] {
        &self.buckets[Self::bucket_index(key, self.capacity())]
    }
}

/// Tables are equal when they hold the same key/value set; layout is ignored.
impl PartialEq for JobTable {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count
            && self
                .entries()
                .all(|r| other.search(&r.key).map_or(false, |v| *v == r.value))
    }
}
