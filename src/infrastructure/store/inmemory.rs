//! In-memory implementation of the workout store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common::time::{now_rfc3339, today, workout_id};
use crate::domain::{LogEntry, StoreError, User, WorkoutPlan, WorkoutRecord, WorkoutStore};

#[derive(Debug, Clone)]
struct StoredWorkout {
    id: String,
    date: String,
    created_at: String,
    plan: WorkoutPlan,
}

#[derive(Default)]
struct StoreInner {
    users: Vec<User>,
    /// Append-only, so the last element is always the newest.
    workouts: Vec<StoredWorkout>,
    logs: Vec<LogEntry>,
}

pub struct InMemoryWorkoutStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryWorkoutStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner::default())),
        }
    }

    /// Store seeded with the house roster.
    pub fn with_default_roster() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                users: default_roster(),
                ..StoreInner::default()
            })),
        }
    }
}

impl Default for InMemoryWorkoutStore {
    fn default() -> Self {
        Self::new()
    }
}

fn user(id: &str, name: &str, role: &str, color: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        color: color.to_string(),
    }
}

fn default_roster() -> Vec<User> {
    vec![
        user("u_richard", "Richard", "admin", "blue"),
        user("u_nina", "Nina", "user", "pink"),
        user("u_ben", "Ben", "kid", "green"),
        user("u_lio", "Lio", "kid", "yellow"),
        user("u_jona", "Jona", "kid", "purple"),
        user("u_imad", "Imad", "user", "indigo"),
        user("u_robert", "Robert", "user", "orange"),
    ]
}

#[async_trait]
impl WorkoutStore for InMemoryWorkoutStore {
    async fn save_plan(&self, plan: &WorkoutPlan) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().await;
        let stored = StoredWorkout {
            id: workout_id(),
            date: today(),
            created_at: now_rfc3339(),
            plan: plan.clone(),
        };
        let id = stored.id.clone();
        inner.workouts.push(stored);
        Ok(id)
    }

    async fn latest_plan(&self) -> Result<Option<WorkoutPlan>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.workouts.last().map(|w| w.plan.clone()))
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.logs.push(entry.clone());
        Ok(())
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.clone())
    }

    async fn history(&self, limit: usize) -> Result<Vec<WorkoutRecord>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .workouts
            .iter()
            .rev()
            .take(limit)
            .map(|workout| WorkoutRecord {
                id: workout.id.clone(),
                date: workout.date.clone(),
                created_at: workout.created_at.clone(),
                plan: workout.plan.clone(),
                logs: inner
                    .logs
                    .iter()
                    .filter(|log| log.workout_id == workout.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::placeholder_plan;

    fn log_for(workout_id: &str, user_id: &str) -> LogEntry {
        LogEntry {
            user_id: user_id.to_string(),
            workout_id: workout_id.to_string(),
            exercise: "WOD".to_string(),
            result: "ok".to_string(),
            feeling: None,
            notes: None,
            timestamp: now_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_latest_plan_on_empty_store_is_none() {
        // given:
        let store = InMemoryWorkoutStore::new();

        // when / then:
        assert_eq!(store.latest_plan().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_latest_round_trips() {
        // given:
        let store = InMemoryWorkoutStore::new();
        let first = placeholder_plan("first");
        let second = placeholder_plan("second");

        // when:
        store.save_plan(&first).await.unwrap();
        store.save_plan(&second).await.unwrap();

        // then: newest plan wins
        assert_eq!(store.latest_plan().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_default_roster_is_seeded() {
        // given:
        let store = InMemoryWorkoutStore::with_default_roster();

        // when:
        let users = store.users().await.unwrap();

        // then:
        assert_eq!(users.len(), 7);
        assert!(users.iter().any(|u| u.name == "Nina"));
        assert!(users.iter().any(|u| u.id == "u_richard" && u.role == "admin"));
    }

    #[tokio::test]
    async fn test_history_attaches_logs_newest_first() {
        // given:
        let store = InMemoryWorkoutStore::new();
        let id_a = store.save_plan(&placeholder_plan("a")).await.unwrap();
        let id_b = store.save_plan(&placeholder_plan("b")).await.unwrap();
        store.append_log(&log_for(&id_a, "u_nina")).await.unwrap();
        store.append_log(&log_for(&id_a, "u_ben")).await.unwrap();

        // when:
        let history = store.history(20).await.unwrap();

        // then:
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, id_b);
        assert!(history[0].logs.is_empty());
        assert_eq!(history[1].id, id_a);
        assert_eq!(history[1].logs.len(), 2);
    }

    #[tokio::test]
    async fn test_history_respects_limit() {
        // given:
        let store = InMemoryWorkoutStore::new();
        for i in 0..5 {
            store
                .save_plan(&placeholder_plan(&format!("plan {}", i)))
                .await
                .unwrap();
        }

        // when:
        let history = store.history(3).await.unwrap();

        // then:
        assert_eq!(history.len(), 3);
    }
}
