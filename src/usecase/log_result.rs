//! UseCase: record a workout result and announce it to the room.

use std::sync::Arc;

use crate::domain::{LogEntry, SnapshotPusher, WorkoutStore};
use crate::infrastructure::dto::websocket::ServerMessage;

use super::error::LogResultError;

pub struct LogResultUseCase {
    store: Arc<dyn WorkoutStore>,
    pusher: Arc<dyn SnapshotPusher>,
}

impl LogResultUseCase {
    pub fn new(store: Arc<dyn WorkoutStore>, pusher: Arc<dyn SnapshotPusher>) -> Self {
        Self { store, pusher }
    }

    /// Persist the entry, then broadcast it as `NEW_LOG`. Persistence comes
    /// first: a log that was announced but never stored would be worse than
    /// one that was stored but never announced.
    pub async fn execute(&self, entry: LogEntry) -> Result<(), LogResultError> {
        self.store.append_log(&entry).await?;

        let message = ServerMessage::NewLog(entry).to_json();
        self.pusher.broadcast(&message).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::now_rfc3339;
    use crate::infrastructure::pusher::WebSocketSnapshotPusher;
    use crate::infrastructure::store::InMemoryWorkoutStore;
    use crate::domain::placeholder_plan;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    fn entry(workout_id: &str) -> LogEntry {
        LogEntry {
            user_id: "u_nina".to_string(),
            workout_id: workout_id.to_string(),
            exercise: "WOD".to_string(),
            result: "12:34".to_string(),
            feeling: Some("good".to_string()),
            notes: None,
            timestamp: now_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_log_is_stored_and_broadcast() {
        // given: one connected client
        let store = Arc::new(InMemoryWorkoutStore::new());
        let workout_id = store.save_plan(&placeholder_plan("p")).await.unwrap();
        let pusher = Arc::new(WebSocketSnapshotPusher::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register(Uuid::new_v4(), tx).await;
        let usecase = LogResultUseCase::new(store.clone(), pusher);

        // when:
        usecase.execute(entry(&workout_id)).await.unwrap();

        // then: persisted and announced
        let history = store.history(10).await.unwrap();
        assert_eq!(history[0].logs.len(), 1);

        let message = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&message).unwrap();
        assert_eq!(value["type"], "NEW_LOG");
        assert_eq!(value["payload"]["user_id"], "u_nina");
        assert_eq!(value["payload"]["result"], "12:34");
    }
}
