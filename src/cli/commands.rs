// Scheduler commands and their text rendering
//
// Shared by one-shot subcommands and the interactive loop. Typed scheduler
// failures are turned into messages here; nothing in this module aborts.

use clap::Subcommand;
use serde_json::Value;

use crate::config::Config;
use crate::errors::SchedulerError;
use crate::persistence::{FreshReason, StateOrigin};
use crate::scheduling::{JobId, TaskScheduler};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a job to the back of the queue
    Submit { job_id: JobId },
    /// Run the job at the head of the queue
    RunNext,
    /// Run every queued job in order
    RunAll,
    /// Show a job's recorded metadata
    Find { job_id: JobId },
    /// Remove a job's record (queue and history are untouched)
    Remove { job_id: JobId },
    /// Show the most recent executions, newest first
    History { count: Option<usize> },
    /// Show pending jobs
    Queue,
    /// Show counters for queue, history, and job table
    Stats,
    /// Show the persisted config section
    Config,
    /// Set a persisted config value (parsed as JSON when possible)
    SetConfig { key: String, value: String },
}

impl Command {
    /// Whether the command changes state (and therefore saves it).
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Submit { .. }
                | Command::RunNext
                | Command::RunAll
                | Command::Remove { .. }
                | Command::SetConfig { .. }
        )
    }
}

pub fn handle_command(command: &Command, scheduler: &mut TaskScheduler, config: &Config) -> String {
    let mut output = match command {
        Command::Submit { job_id } => submit(scheduler, job_id),
        Command::RunNext => run_next(scheduler),
        Command::RunAll => run_all(scheduler),
        Command::Find { job_id } => find(scheduler, job_id),
        Command::Remove { job_id } => remove(scheduler, job_id),
        Command::History { count } => {
            format_history(scheduler, count.unwrap_or(config.history_display_limit))
        }
        Command::Queue => format_queue(scheduler),
        Command::Stats => format_stats(scheduler),
        Command::Config => format_config(scheduler),
        Command::SetConfig { key, value } => set_config(scheduler, key, value),
    };

    if command.is_mutating() {
        if let Some(err) = scheduler.last_save_error() {
            output.push_str(&format!("\nWarning: changes were not saved ({})", err));
        }
    }
    output
}

/// One-line description of where the startup state came from.
pub fn describe_origin(origin: &StateOrigin, path: &std::path::Path) -> String {
    match origin {
        StateOrigin::Loaded => format!("App state loaded from {}.", path.display()),
        StateOrigin::Fresh(FreshReason::Missing) => "Starting with a fresh state.".to_string(),
        StateOrigin::Fresh(FreshReason::Malformed(msg))
        | StateOrigin::Fresh(FreshReason::Unreadable(msg)) => {
            format!("Starting with a fresh state (saved state ignored: {}).", msg)
        }
    }
}

fn submit(scheduler: &mut TaskScheduler, job_id: &str) -> String {
    if job_id.trim().is_empty() {
        return "Error: job ID cannot be empty.".to_string();
    }
    scheduler.submit_task(job_id);
    format!("✓ Task '{}' submitted to queue.", job_id)
}

fn run_next(scheduler: &mut TaskScheduler) -> String {
    match scheduler.run_next_task() {
        Ok(job_id) => format!("✓ Task '{}' executed and added to history.", job_id),
        Err(e) => describe_error(&e),
    }
}

fn run_all(scheduler: &mut TaskScheduler) -> String {
    let executed = scheduler.run_all();
    if executed.is_empty() {
        return describe_error(&SchedulerError::EmptyQueue);
    }
    format!(
        "✓ Executed {} task(s): {}",
        executed.len(),
        executed.join(", ")
    )
}

fn find(scheduler: &TaskScheduler, job_id: &str) -> String {
    match scheduler.find_job(job_id) {
        Ok(metadata) => {
            let mut output = format!("Job '{}':\n", job_id);
            match metadata {
                Value::Object(fields) => {
                    for (key, value) in fields {
                        output.push_str(&format!("  {}: {}\n", key, display_value(value)));
                    }
                }
                other => output.push_str(&format!("  {}\n", display_value(other))),
            }
            output.trim_end().to_string()
        }
        Err(e) => describe_error(&e),
    }
}

fn remove(scheduler: &mut TaskScheduler, job_id: &str) -> String {
    match scheduler.remove_job(job_id) {
        Ok(_) => format!("✓ Job '{}' removed from job table.", job_id),
        Err(e) => describe_error(&e),
    }
}

fn set_config(scheduler: &mut TaskScheduler, key: &str, raw: &str) -> String {
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    let shown = value.to_string();
    scheduler.set_config(key, value);
    format!("✓ Config '{}' set to {}.", key, shown)
}

fn format_history(scheduler: &TaskScheduler, count: usize) -> String {
    let entries = scheduler.get_last_n_tasks(count);
    if entries.is_empty() {
        return "No tasks in history.".to_string();
    }

    let mut output = format!(
        "Last {} of {} executed task(s):\n",
        entries.len(),
        scheduler.history_size()
    );
    for (i, entry) in entries.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {} | {}\n",
            i + 1,
            entry.job_id,
            entry.timestamp
        ));
    }
    output.trim_end().to_string()
}

fn format_queue(scheduler: &TaskScheduler) -> String {
    let Ok(next) = scheduler.peek_next() else {
        return "Queue is empty.".to_string();
    };

    let mut output = format!(
        "Queue size: {}\nNext task: {}\n",
        scheduler.queue_size(),
        next
    );
    for (i, job_id) in scheduler.queued_jobs().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, job_id));
    }
    output.trim_end().to_string()
}

fn format_stats(scheduler: &TaskScheduler) -> String {
    let stats = scheduler.stats();
    format!(
        "Scheduler statistics:\n\
        Pending tasks in queue: {}\n\
        Executed tasks in history: {}\n\
        Jobs in table: {}\n\
        Table capacity: {} (load factor {:.2})",
        stats.queued, stats.executed, stats.tracked_jobs, stats.table_capacity, stats.load_factor
    )
}

fn format_config(scheduler: &TaskScheduler) -> String {
    let config = scheduler.config();
    if config.is_empty() {
        return "Config is empty.".to_string();
    }
    config
        .iter()
        .map(|(key, value)| format!("{} = {}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_error(err: &SchedulerError) -> String {
    match err {
        SchedulerError::EmptyQueue => "No tasks in queue to execute.".to_string(),
        SchedulerError::KeyNotFound(job_id) => format!("Job '{}' not found.", job_id),
        other => format!("Error: {}", other),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::SchedulerState;

    fn setup() -> (TaskScheduler, Config) {
        (
            TaskScheduler::in_memory(SchedulerState::empty(16)),
            Config::default(),
        )
    }

    fn run(command: Command, s: &mut TaskScheduler, config: &Config) -> String {
        handle_command(&command, s, config)
    }

    #[test]
    fn test_submit_and_queue_listing() {
        let (mut s, config) = setup();
        let out = run(Command::Submit { job_id: "job1".into() }, &mut s, &config);
        assert!(out.contains("job1"));
        run(Command::Submit { job_id: "job2".into() }, &mut s, &config);

        let out = run(Command::Queue, &mut s, &config);
        assert!(out.contains("Queue size: 2"));
        assert!(out.contains("Next task: job1"));
        assert!(out.contains("2. job2"));
    }

    #[test]
    fn test_empty_job_id_rejected() {
        let (mut s, config) = setup();
        let out = run(Command::Submit { job_id: "  ".into() }, &mut s, &config);
        assert!(out.starts_with("Error"));
        assert_eq!(s.queue_size(), 0);
    }

    #[test]
    fn test_run_on_empty_queue_is_a_message() {
        let (mut s, config) = setup();
        assert_eq!(
            run(Command::RunNext, &mut s, &config),
            "No tasks in queue to execute."
        );
        assert_eq!(
            run(Command::RunAll, &mut s, &config),
            "No tasks in queue to execute."
        );
        assert_eq!(run(Command::Queue, &mut s, &config), "Queue is empty.");
    }

    #[test]
    fn test_run_all_then_history() {
        let (mut s, config) = setup();
        for id in ["a", "b", "c"] {
            s.submit_task(id);
        }
        let out = run(Command::RunAll, &mut s, &config);
        assert!(out.contains("Executed 3 task(s): a, b, c"));

        let out = run(Command::History { count: Some(2) }, &mut s, &config);
        assert!(out.contains("Last 2 of 3"));
        let c_pos = out.find("1. c").unwrap();
        let b_pos = out.find("2. b").unwrap();
        assert!(c_pos < b_pos);
        assert!(!out.contains(". a |"));
    }

    #[test]
    fn test_history_uses_display_limit() {
        let (mut s, mut config) = setup();
        config.history_display_limit = 1;
        s.submit_task("a");
        s.submit_task("b");
        s.run_all();
        let out = run(Command::History { count: None }, &mut s, &config);
        assert!(out.contains("Last 1 of 2"));
        let mut empty = TaskScheduler::in_memory(SchedulerState::default());
        assert_eq!(
            run(Command::History { count: None }, &mut empty, &config),
            "No tasks in history."
        );
    }

    #[test]
    fn test_find_and_remove() {
        let (mut s, config) = setup();
        s.submit_task("job1");
        let out = run(Command::Find { job_id: "job1".into() }, &mut s, &config);
        assert!(out.contains("status: queued"));

        let out = run(Command::Remove { job_id: "job1".into() }, &mut s, &config);
        assert!(out.contains("removed"));
        assert_eq!(
            run(Command::Find { job_id: "job1".into() }, &mut s, &config),
            "Job 'job1' not found."
        );
        assert_eq!(
            run(Command::Remove { job_id: "job1".into() }, &mut s, &config),
            "Job 'job1' not found."
        );
    }

    #[test]
    fn test_set_config_parses_json_or_string() {
        let (mut s, config) = setup();
        run(
            Command::SetConfig {
                key: "limit".into(),
                value: "5".into(),
            },
            &mut s,
            &config,
        );
        run(
            Command::SetConfig {
                key: "owner".into(),
                value: "ops team".into(),
            },
            &mut s,
            &config,
        );
        assert_eq!(s.config()["limit"], 5);
        assert_eq!(s.config()["owner"], "ops team");

        let out = run(Command::Config, &mut s, &config);
        assert!(out.contains("limit = 5"));
        assert!(out.contains("owner = \"ops team\""));
    }

    #[test]
    fn test_stats_output() {
        let (mut s, config) = setup();
        s.submit_task("a");
        let out = run(Command::Stats, &mut s, &config);
        assert!(out.contains("Pending tasks in queue: 1"));
        assert!(out.contains("Jobs in table: 1"));
        assert!(out.contains("Table capacity: 16"));
    }

    #[test]
    fn test_failed_save_adds_warning() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = crate::persistence::StateStore::new(blocker.join("state.json"), 16);
        let (mut s, _) = TaskScheduler::open(store);
        let config = Config::default();

        let out = run(Command::Submit { job_id: "job1".into() }, &mut s, &config);
        assert!(out.contains("Warning: changes were not saved"));
        let out = run(Command::Stats, &mut s, &config);
        assert!(!out.contains("Warning"));
    }

    #[test]
    fn test_describe_origin() {
        let path = std::path::Path::new("state.json");
        assert!(describe_origin(&StateOrigin::Loaded, path).contains("loaded from state.json"));
        assert_eq!(
            describe_origin(&StateOrigin::Fresh(FreshReason::Missing), path),
            "Starting with a fresh state."
        );
        assert!(describe_origin(
            &StateOrigin::Fresh(FreshReason::Malformed("bad".into())),
            path
        )
        .contains("bad"));
    }
}
