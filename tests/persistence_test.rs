// Integration tests for scheduler persistence
//
// Every mutating operation must leave the state file matching memory, and a
// reopened scheduler must resume exactly where the previous one stopped.

use serde_json::json;
use std::fs;
use std::path::Path;
use taskkeeper::persistence::{FreshReason, StateOrigin, StateStore, STATE_VERSION};
use taskkeeper::scheduling::{status_of, JobStatus, TaskScheduler};
use taskkeeper::SchedulerError;

fn open(path: &Path) -> (TaskScheduler, StateOrigin) {
    TaskScheduler::open(StateStore::new(path, 16))
}

fn history_ids(s: &TaskScheduler) -> Vec<String> {
    s.history().map(|e| e.job_id.clone()).collect()
}

// ── resume across sessions ────────────────────────────────────────────────────

#[test]
fn test_reopen_resumes_queue_history_and_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app_state.json");

    {
        let (mut s, origin) = open(&path);
        assert_eq!(origin, StateOrigin::Fresh(FreshReason::Missing));
        for id in ["job1", "job2", "job3"] {
            s.submit_task(id);
        }
        assert_eq!(s.run_next_task().unwrap(), "job1");
    }

    let (mut s, origin) = open(&path);
    assert_eq!(origin, StateOrigin::Loaded);
    assert_eq!(s.queued_jobs().cloned().collect::<Vec<_>>(), vec!["job2", "job3"]);
    assert_eq!(history_ids(&s), vec!["job1"]);
    assert_eq!(status_of(s.find_job("job1").unwrap()), Some(JobStatus::Executed));
    assert_eq!(status_of(s.find_job("job2").unwrap()), Some(JobStatus::Queued));

    assert_eq!(s.run_all(), vec!["job2", "job3"]);
    drop(s);

    let (s, _) = open(&path);
    assert_eq!(s.queue_size(), 0);
    assert_eq!(history_ids(&s), vec!["job3", "job2", "job1"]);
}

#[test]
fn test_run_all_single_save_matches_stepwise_result() {
    let dir = tempfile::tempdir().unwrap();
    let batch_path = dir.path().join("batch.json");
    let step_path = dir.path().join("step.json");

    let (mut batch, _) = open(&batch_path);
    let (mut step, _) = open(&step_path);
    for id in ["a", "b", "c", "a"] {
        batch.submit_task(id);
        step.submit_task(id);
    }
    batch.run_all();
    while step.run_next_task().is_ok() {}

    let batch_state = StateStore::new(&batch_path, 16).load().state;
    let step_state = StateStore::new(&step_path, 16).load().state;
    assert_eq!(batch_state.queue, step_state.queue);
    assert_eq!(
        batch_state.history.iter().map(|e| &e.job_id).collect::<Vec<_>>(),
        step_state.history.iter().map(|e| &e.job_id).collect::<Vec<_>>()
    );
    assert_eq!(batch_state.table.len(), step_state.table.len());
}

#[test]
fn test_resized_table_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let (mut s, _) = open(&path);
    for i in 0..13 {
        s.submit_task(format!("job{}", i));
    }
    assert_eq!(s.stats().table_capacity, 32);
    drop(s);

    let (s, _) = open(&path);
    assert_eq!(s.stats().table_capacity, 32);
    assert_eq!(s.stats().tracked_jobs, 13);
    for i in 0..13 {
        assert!(s.find_job(&format!("job{}", i)).is_ok());
    }
}

#[test]
fn test_removed_job_stays_removed_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let (mut s, _) = open(&path);
    s.submit_task("keep");
    s.submit_task("drop");
    s.remove_job("drop").unwrap();
    drop(s);

    let (s, _) = open(&path);
    assert!(matches!(s.find_job("drop"), Err(SchedulerError::KeyNotFound(_))));
    assert!(s.find_job("keep").is_ok());
    // Removal only touches the table.
    assert_eq!(s.queue_size(), 2);
}

#[test]
fn test_config_section_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let (mut s, _) = open(&path);
    s.set_config("retention", json!({ "days": 30, "compress": true }));
    drop(s);

    let (s, _) = open(&path);
    assert_eq!(s.config()["retention"]["days"], 30);
    assert_eq!(s.config()["retention"]["compress"], true);
}

// ── document format ───────────────────────────────────────────────────────────

#[test]
fn test_saved_document_has_documented_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let (mut s, _) = open(&path);
    s.submit_task("job1");
    s.submit_task("job2");
    s.run_next_task().unwrap();

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["queue"]["items"], json!(["job2"]));
    assert_eq!(doc["history"]["entries"][0]["job_id"], "job1");
    assert!(doc["history"]["entries"][0]["timestamp"].is_string());
    assert_eq!(doc["hash_table"]["capacity"], 16);
    assert_eq!(doc["hash_table"]["entries"].as_array().unwrap().len(), 2);
    assert!(doc["config"].is_object());
    assert_eq!(doc["metadata"]["version"], STATE_VERSION);
    assert!(doc["metadata"]["saved_at"].is_string());
}

#[test]
fn test_hand_written_document_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let doc = json!({
        "queue": { "items": ["b", "c"] },
        "history": { "entries": [
            { "job_id": "a2", "timestamp": "2026-03-02T10:00:00Z" },
            { "job_id": "a1", "timestamp": "2026-03-01T10:00:00Z" }
        ] },
        "hash_table": { "capacity": 8, "entries": [
            { "key": "b", "value": { "status": "queued" } },
            { "key": "c", "value": { "status": "queued", "owner": "ops" } }
        ] },
        "config": { "theme": "dark" },
        "metadata": { "saved_at": "2026-03-02T10:00:01Z", "version": 1 }
    });
    fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    let (s, origin) = open(&path);
    assert!(origin.is_loaded());
    assert_eq!(s.peek_next().unwrap(), "b");
    assert_eq!(history_ids(&s), vec!["a2", "a1"]);
    assert_eq!(s.find_job("c").unwrap()["owner"], "ops");
    assert_eq!(s.stats().table_capacity, 8);
    assert_eq!(s.config()["theme"], "dark");
}

#[test]
fn test_corrupt_file_is_replaced_on_next_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{\"queue\": ").unwrap();

    let (mut s, origin) = open(&path);
    assert!(matches!(origin, StateOrigin::Fresh(FreshReason::Malformed(_))));
    assert_eq!(s.queue_size(), 0);

    s.submit_task("job1");
    let (s, origin) = open(&path);
    assert!(origin.is_loaded());
    assert_eq!(s.queue_size(), 1);
}
