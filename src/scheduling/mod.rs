// Scheduling core: queue, history, job table, and the scheduler over them

pub mod history;
pub mod job;
pub mod job_table;
pub mod queue;
pub mod scheduler;
pub mod state;

pub use history::{HistoryEntry, HistoryLog};
pub use job::{mark_executed, now_timestamp, status_of, submitted_metadata, JobId, JobStatus};
pub use job_table::{JobRecord, JobTable, DEFAULT_CAPACITY, MAX_LOAD_FACTOR};
pub use queue::JobQueue;
pub use scheduler::{SchedulerStats, TaskScheduler};
pub use state::SchedulerState;
