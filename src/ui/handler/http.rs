//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    domain::{LogEntry, Snapshot, User, WorkoutPlan, WorkoutRecord},
    infrastructure::dto::http::{GeneratePlanRequest, LogRequest},
    ui::state::AppState,
};

const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the participant roster
pub async fn get_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, StatusCode> {
    match state.store.users().await {
        Ok(users) => Ok(Json(users)),
        Err(e) => {
            tracing::error!("Failed to read users: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get the most recently stored workout plan. An empty plan when nothing
/// has been generated yet, so the frontend always has something to render.
pub async fn get_current_workout(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WorkoutPlan>, StatusCode> {
    match state.store.latest_plan().await {
        Ok(plan) => Ok(Json(plan.unwrap_or_default())),
        Err(e) => {
            tracing::error!("Failed to read current workout: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Generate a new workout plan and put it live. Returns the snapshot every
/// connected client was just pushed.
pub async fn generate_workout(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GeneratePlanRequest>,
) -> Json<Snapshot> {
    let snapshot = state
        .generate_plan_usecase
        .execute(&request.participants, request.instruction.as_deref())
        .await;
    Json(snapshot)
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Get recent workouts with their logged results, newest first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<WorkoutRecord>>, StatusCode> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match state.store.history(limit).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            tracing::error!("Failed to read history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Record a workout result and announce it to the room
pub async fn post_log(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LogRequest>,
) -> Result<StatusCode, StatusCode> {
    let entry = LogEntry::from(request);
    match state.log_result_usecase.execute(entry).await {
        Ok(()) => Ok(StatusCode::CREATED),
        Err(e) => {
            tracing::error!("Failed to record log: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
