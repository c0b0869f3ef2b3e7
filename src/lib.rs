// Taskkeeper - single-process task scheduler with persisted state
// Library exports

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod persistence;
pub mod scheduling;

pub use errors::{Result, SchedulerError};
pub use persistence::{StateOrigin, StateStore};
pub use scheduling::{SchedulerState, TaskScheduler};
