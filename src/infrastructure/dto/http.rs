//! HTTP API request DTOs.

use serde::Deserialize;

use crate::common::time::now_rfc3339;
use crate::domain::LogEntry;

/// Body of `POST /log`. The timestamp is stamped server-side.
#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub user_id: String,
    pub workout_id: String,
    pub exercise: String,
    pub result: String,
    #[serde(default)]
    pub feeling: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<LogRequest> for LogEntry {
    fn from(req: LogRequest) -> Self {
        LogEntry {
            user_id: req.user_id,
            workout_id: req.workout_id,
            exercise: req.exercise,
            result: req.result,
            feeling: req.feeling,
            notes: req.notes,
            timestamp: now_rfc3339(),
        }
    }
}

/// Body of `POST /workout/generate`.
#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub instruction: Option<String>,
}
