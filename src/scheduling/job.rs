// Job status values and metadata documents stored in the job table

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Job identifier. Equality is exact string match.
pub type JobId = String;

/// Status recorded in a job's metadata.
///
/// Execution moves a job straight from `Queued` to `Executed`; `Running`
/// is never recorded by the scheduler and is only recognised when read
/// back from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Executed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Executed => "executed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current time as an RFC 3339 string in UTC.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Metadata for a freshly submitted job.
pub fn submitted_metadata(job_id: &str, submitted_at: &str) -> Value {
    json!({
        "job_id": job_id,
        "status": JobStatus::Queued,
        "submitted_at": submitted_at,
    })
}

/// Mark a metadata document as executed. Non-object metadata (possible
/// when loaded from a hand-edited file) is replaced by an object.
pub fn mark_executed(metadata: &mut Value, executed_at: &str) {
    if !metadata.is_object() {
        *metadata = json!({});
    }
    metadata["status"] = json!(JobStatus::Executed);
    metadata["executed_at"] = json!(executed_at);
}

/// Status field of a metadata document, if it holds a known value.
pub fn status_of(metadata: &Value) -> Option<JobStatus> {
    metadata
        .get("status")
        .cloned()
        .and_then(|s| serde_json::from_value(s).ok())
}
