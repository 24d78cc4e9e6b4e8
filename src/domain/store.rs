//! Workout store trait: the persistence interface the core needs from its
//! external key-value/relational collaborator. Only append-style writes and
//! simple reads; durability is the implementation's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::plan::WorkoutPlan;

/// A person tracked for round counts and logged results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: String,
    pub color: String,
}

/// One logged workout result, broadcast as the `NEW_LOG` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub user_id: String,
    pub workout_id: String,
    pub exercise: String,
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// RFC 3339, stamped by the server on append.
    #[serde(default)]
    pub timestamp: String,
}

/// A stored workout with its logged results, as returned by the history
/// read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutRecord {
    pub id: String,
    pub date: String,
    pub created_at: String,
    pub plan: WorkoutPlan,
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// External store collaborator.
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Append a finalized plan; returns the generated workout id.
    async fn save_plan(&self, plan: &WorkoutPlan) -> Result<String, StoreError>;

    /// Most recently stored plan, used to seed the session at startup.
    async fn latest_plan(&self) -> Result<Option<WorkoutPlan>, StoreError>;

    /// Append one logged result.
    async fn append_log(&self, entry: &LogEntry) -> Result<(), StoreError>;

    /// The participant roster.
    async fn users(&self) -> Result<Vec<User>, StoreError>;

    /// Recent workouts, newest first, each with its logs attached.
    async fn history(&self, limit: usize) -> Result<Vec<WorkoutRecord>, StoreError>;
}
